use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use facecheck_core::{CheckInWorkflow, Customer, Listing, Task};
use facecheck_net::{ImagePayload, ModelHostClient, RestBackend};
use std::path::PathBuf;

mod config;
mod render;

use config::Config;

#[derive(Parser)]
#[command(name = "facecheck", about = "Face-recognition check-in client", version)]
struct Cli {
    /// Backend REST API base URL (overrides FACECHECK_HOST_URL)
    #[arg(long, global = true)]
    host_url: Option<String>,
    /// Model host base URL (overrides FACECHECK_MODEL_URL)
    #[arg(long, global = true)]
    model_url: Option<String>,
    /// Bearer token for the backend (overrides FACECHECK_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Search {
    /// Name filter; empty matches everything
    #[arg(short, long, default_value = "")]
    query: String,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u32,
    /// Page size (default from config)
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect every face in an image and record a check-in for each
    CheckIn {
        /// Image file to upload
        image: PathBuf,
    },
    /// Verify the single face in an image and record the check-in
    Verify {
        /// Image file to verify
        image: PathBuf,
    },
    /// Send labelled training images of a customer to the model host
    Enroll {
        /// Customer name the images belong to
        #[arg(short, long)]
        customer: String,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// List check-in records for a day
    Records {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List notifications
    Notifications,
    /// Search customers
    Customers(Search),
    /// Register a customer
    CustomerAdd {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        /// Birthday as YYYY-MM-DD
        #[arg(long)]
        birthday: Option<String>,
    },
    /// Update a customer's details
    CustomerUpdate {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        birthday: Option<String>,
    },
    /// Delete a customer
    CustomerRm { id: i64 },
    /// Search tasks
    Tasks(Search),
    /// Show the tasks of one or more customers
    TasksFor {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Create a task
    TaskAdd {
        #[arg(long)]
        name: String,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Update a task
    TaskUpdate {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a task
    TaskRm { id: i64 },
    /// Show model host health and dashboard counts
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.host_url {
        config.host_url = url;
    }
    if let Some(url) = cli.model_url {
        config.model_url = url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    tracing::debug!(host = %config.host_url, model = %config.model_url, "configuration loaded");

    let backend = RestBackend::new(&config.host_url, config.token.clone(), config.timeout())
        .context("creating backend client")?;
    let model_host = ModelHostClient::new(&config.model_url, config.timeout())
        .context("creating model host client")?;

    match cli.command {
        Commands::CheckIn { image } => {
            let image = ImagePayload::from_path(&image)?;
            let upload = model_host.upload(&image).await.context("upload failed")?;
            let workflow = CheckInWorkflow::new(backend);
            let outcome = workflow.process_upload(&upload).await?;
            print!("{}", render::batch(&outcome));
            for warning in render::batch_warnings(&outcome) {
                eprintln!("warning: {warning}");
            }
        }
        Commands::Verify { image } => {
            let image = ImagePayload::from_path(&image)?;
            let response = model_host.verify(&image).await.context("verify failed")?;
            let workflow = CheckInWorkflow::new(backend);
            let outcome = workflow.process_verify(&response).await?;
            print!("{}", render::batch(&outcome));
            let warnings = render::batch_warnings(&outcome);
            if !warnings.is_empty() {
                bail!("{}", warnings.join("; "));
            }
        }
        Commands::Enroll { customer, images } => {
            let total = images.len();
            for path in images {
                let image = ImagePayload::from_path(&path)?;
                let response = model_host
                    .retrieve(&image, &customer)
                    .await
                    .with_context(|| format!("sending {}", path.display()))?;
                if !response.is_success() {
                    bail!(
                        "model host rejected {}: {}",
                        path.display(),
                        response
                            .error
                            .or(response.message)
                            .unwrap_or(response.status)
                    );
                }
                tracing::info!(file = %path.display(), customer = %customer, "training image stored");
            }
            println!("Uploaded {total} image(s) for {customer}");
        }
        Commands::Records { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let records = backend.records_on(date).await?;
            print!("{}", render::records(&records));
        }
        Commands::Notifications => {
            let notifications = backend.notifications().await?;
            let now = chrono::Local::now().naive_local();
            print!("{}", render::notifications(&notifications, now));
        }
        Commands::Customers(search) => {
            let mut listing: Listing<Customer> =
                Listing::new(search.size.unwrap_or(config.page_size));
            listing.cursor_mut().go_to(search.page);
            let cursor = *listing.cursor();
            let page = backend
                .search_customers(&search.query, cursor.page, cursor.size)
                .await?;
            listing.replace(page);
            print!("{}", render::customers(&listing));
        }
        Commands::CustomerAdd {
            name,
            email,
            address,
            gender,
            birthday,
        } => {
            let customer = Customer {
                name,
                email,
                address,
                gender,
                birthday,
                ..Customer::default()
            };
            if !backend.create_customer(&customer).await? {
                bail!("backend did not create customer {}", customer.name);
            }
            println!("Added customer {}", customer.name);
        }
        Commands::CustomerUpdate {
            id,
            name,
            email,
            address,
            gender,
            birthday,
        } => {
            let customer = Customer {
                customer_id: Some(id),
                name,
                email,
                address,
                gender,
                birthday,
                ..Customer::default()
            };
            let updated = backend.update_customer(id, &customer).await?;
            println!("Updated customer {id}: {}", updated.name);
        }
        Commands::CustomerRm { id } => {
            if !backend.delete_customer(id).await? {
                bail!("backend did not delete customer {id}");
            }
            println!("Deleted customer {id}");
        }
        Commands::Tasks(search) => {
            let mut listing: Listing<Task> = Listing::new(search.size.unwrap_or(config.page_size));
            listing.cursor_mut().go_to(search.page);
            let cursor = *listing.cursor();
            let page = backend
                .search_tasks(&search.query, cursor.page, cursor.size)
                .await?;
            listing.replace(page);
            print!("{}", render::tasks(&listing));
        }
        Commands::TasksFor { names } => {
            let names = facecheck_core::tasks::dedup_names(names);
            let lookup = facecheck_core::tasks::lookup_tasks(&backend, &names).await;
            if let facecheck_core::TaskLookup::Failed(err) = lookup {
                return Err(err).context("task lookup failed");
            }
            print!("{}", render::task_lookup(&lookup));
        }
        Commands::TaskAdd { name, desc, status } => {
            let task = Task {
                name: Some(name),
                description: desc,
                status,
                ..Task::default()
            };
            if !backend.create_task(&task).await? {
                bail!("backend did not create the task");
            }
            println!("Added task {}", task.name.as_deref().unwrap_or_default());
        }
        Commands::TaskUpdate {
            id,
            name,
            desc,
            status,
        } => {
            let task = Task {
                task_id: Some(id),
                name,
                description: desc,
                status,
                ..Task::default()
            };
            let updated = backend.update_task(id, &task).await?;
            print!("{}", render::task_table(std::slice::from_ref(&updated)));
        }
        Commands::TaskRm { id } => {
            if !backend.delete_task(id).await? {
                bail!("backend did not delete task {id}");
            }
            println!("Deleted task {id}");
        }
        Commands::Status => {
            match model_host.health().await {
                Ok(health) => println!(
                    "model host: {} ({})",
                    health.status,
                    health.message.unwrap_or_default()
                ),
                Err(err) => println!("model host: unreachable ({err})"),
            }
            let records = backend.count_records().await?;
            let customers = backend.count_customers().await?;
            println!("check-in records: {records}");
            println!("registered customers: {customers}");
        }
    }

    Ok(())
}
