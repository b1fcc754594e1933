//! Backend REST client.
//!
//! All requests carry the bearer token when one is configured. Entity
//! lifecycles are owned by the backend; this client only issues the calls.

use crate::{http_client, join_segments, parse_base_url, send_json, NetError};
use async_trait::async_trait;
use chrono::NaiveDate;
use facecheck_core::types::{CheckInRecord, Customer, NewRecord, Notification, Page, Task};
use facecheck_core::{Backend, BackendError};
use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct Deleted {
    deleted: bool,
}

#[derive(Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, NetError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: parse_base_url(base_url)?,
            token,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, NetError> {
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push("api");
        all.extend_from_slice(segments);
        join_segments(&self.base_url, &all)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// URL of the batched task lookup: a path segment for one name, a
    /// comma-separated `customerList` query for several.
    pub fn tasks_for_customers_url(&self, names: &[String]) -> Result<Url, NetError> {
        match names {
            [single] => self.url(&["tasks", "getTask", single.as_str()]),
            _ => {
                let mut url = self.url(&["tasks", "getTask"])?;
                url.query_pairs_mut()
                    .append_pair("customerList", &names.join(","));
                Ok(url)
            }
        }
    }

    fn search_url(&self, entity: &str, query: &str, page: u32, size: u32) -> Result<Url, NetError> {
        let mut url = self.url(&[entity, "query"])?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string());
        Ok(url)
    }

    // --- records ---

    pub async fn records_on(&self, date: NaiveDate) -> Result<Vec<CheckInRecord>, NetError> {
        let mut url = self.url(&["records", "query"])?;
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string());
        send_json(self.request(Method::GET, url)).await
    }

    pub async fn count_records(&self) -> Result<u64, NetError> {
        let url = self.url(&["records", "count"])?;
        send_json(self.request(Method::GET, url)).await
    }

    // --- notifications ---

    pub async fn notifications(&self) -> Result<Vec<Notification>, NetError> {
        let url = self.url(&["notifications"])?;
        send_json(self.request(Method::GET, url)).await
    }

    // --- tasks ---

    pub async fn search_tasks(&self, query: &str, page: u32, size: u32) -> Result<Page<Task>, NetError> {
        let url = self.search_url("tasks", query, page, size)?;
        send_json(self.request(Method::GET, url)).await
    }

    pub async fn create_task(&self, task: &Task) -> Result<bool, NetError> {
        let url = self.url(&["tasks"])?;
        send_json(self.request(Method::POST, url).json(task)).await
    }

    pub async fn update_task(&self, task_id: i64, task: &Task) -> Result<Task, NetError> {
        let id = task_id.to_string();
        let url = self.url(&["tasks", id.as_str()])?;
        send_json(self.request(Method::PATCH, url).json(task)).await
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<bool, NetError> {
        let id = task_id.to_string();
        let url = self.url(&["tasks", id.as_str()])?;
        let deleted: Deleted = send_json(self.request(Method::DELETE, url)).await?;
        Ok(deleted.deleted)
    }

    // --- customers ---

    pub async fn search_customers(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<Customer>, NetError> {
        let url = self.search_url("customers", query, page, size)?;
        send_json(self.request(Method::GET, url)).await
    }

    pub async fn count_customers(&self) -> Result<u64, NetError> {
        let url = self.url(&["customers", "count"])?;
        send_json(self.request(Method::GET, url)).await
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<bool, NetError> {
        let url = self.url(&["customers"])?;
        send_json(self.request(Method::POST, url).json(customer)).await
    }

    pub async fn update_customer(
        &self,
        customer_id: i64,
        customer: &Customer,
    ) -> Result<Customer, NetError> {
        let id = customer_id.to_string();
        let url = self.url(&["customers", id.as_str()])?;
        send_json(self.request(Method::PATCH, url).json(customer)).await
    }

    pub async fn delete_customer(&self, customer_id: i64) -> Result<bool, NetError> {
        let id = customer_id.to_string();
        let url = self.url(&["customers", id.as_str()])?;
        let deleted: Deleted = send_json(self.request(Method::DELETE, url)).await?;
        Ok(deleted.deleted)
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn create_record(&self, record: &NewRecord) -> Result<bool, BackendError> {
        let url = self.url(&["records"])?;
        Ok(send_json(self.request(Method::POST, url).json(record)).await?)
    }

    async fn create_notification(&self, message: &str) -> Result<bool, BackendError> {
        let url = self.url(&["notifications"])?;
        // The endpoint takes the message as a bare JSON string.
        Ok(send_json(self.request(Method::POST, url).json(message)).await?)
    }

    async fn tasks_for_customers(&self, names: &[String]) -> Result<Vec<Task>, BackendError> {
        let url = self.tasks_for_customers_url(names)?;
        tracing::debug!(%url, "looking up tasks");
        Ok(send_json(self.request(Method::GET, url)).await?)
    }
}
