//! Careers CLI
//!
//! Queries job postings and blog posts from the CMS, and can export every
//! active posting to data/jobs.json.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use careers_client::{CmsArgs, CmsClient};
use careers_common::richtext::{excerpt, format_salary, plain_text};
use careers_common::search::DEFAULT_JOB_LIMIT;
use careers_common::{page_window, FilterKey, JobPost, JobSearchParams, PostListParams};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Covers this binary's own target and `careers_client` by prefix.
const DEFAULT_LOG_FILTER: &str = "careers=info";

#[derive(Parser)]
#[command(name = "careers", version, about = "Search job postings and blog posts in the CMS")]
struct Cli {
    #[command(flatten)]
    cms: CmsArgs,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search active job postings
    Jobs {
        /// Keyword matched against title and description
        #[arg(long)]
        q: Option<String>,

        /// full-time, part-time, contract or internship
        #[arg(long)]
        employment_type: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        min_salary: Option<String>,

        #[arg(long)]
        max_salary: Option<String>,

        /// newest, oldest, salary-desc, salary-asc or title
        #[arg(long)]
        sort: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_JOB_LIMIT)]
        limit: u32,
    },
    /// Show one job posting
    Job { id: String },
    /// List published blog posts
    Posts {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one blog post
    Post { slug: String },
    /// Write every active job posting to a JSON file
    Export {
        #[arg(long, default_value = "data/jobs.json")]
        out: PathBuf,
    },
}

fn print_job_line(job: &JobPost) {
    let company = job.company_name().unwrap_or("Unknown Company");
    let kind = job.employment_type.as_ref().map(|k| k.label()).unwrap_or("-");
    let location = job.location.as_deref().unwrap_or("-");
    print!("[{}] {} at {} ({kind}, {location})", job.id, job.title, company);
    if let Some(salary) = format_salary(job.salary_min, job.salary_max) {
        print!(" {salary}");
    }
    println!();
}

fn write_export(path: &Path, jobs: &[JobPost]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            info!("📁 Created {:?}", dir);
        }
    }
    let json = serde_json::to_string_pretty(jobs)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = CmsClient::new(cli.cms.to_config()?)?;

    match cli.command {
        Commands::Jobs {
            q,
            employment_type,
            location,
            min_salary,
            max_salary,
            sort,
            page,
            limit,
        } => {
            let params = [
                (FilterKey::Keyword, q),
                (FilterKey::EmploymentType, employment_type),
                (FilterKey::Location, location),
                (FilterKey::MinSalary, min_salary),
                (FilterKey::MaxSalary, max_salary),
                (FilterKey::Sort, sort),
                (FilterKey::Limit, Some(limit.to_string())),
            ]
            .into_iter()
            .fold(JobSearchParams::default(), |params, (key, value)| {
                params.with_filter(key, value)
            })
            .with_page(page);

            let results = client.search_jobs(&params).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            if results.is_empty() {
                println!("No jobs match these filters.");
                return Ok(());
            }
            println!("📊 {} jobs found\n", results.total_docs);
            for job in &results.docs {
                print_job_line(job);
            }
            let window: Vec<String> = page_window(results.page, results.total_pages)
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("\nPage {} of {}: {}", results.page, results.total_pages, window.join(" "));
        }
        Commands::Job { id } => {
            let job = client.job(&id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&job)?);
                return Ok(());
            }
            print_job_line(&job);
            if let Some(description) = &job.description {
                println!("\n{}", plain_text(description));
            }
            if !job.benefits.is_empty() {
                println!("\nBenefits:");
                for benefit in &job.benefits {
                    println!("  - {benefit}");
                }
            }
        }
        Commands::Posts { page } => {
            let params = PostListParams {
                page: page.max(1),
                ..PostListParams::default()
            };
            let posts = client.list_posts(&params).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            for post in &posts.docs {
                let summary = post
                    .excerpt
                    .clone()
                    .or_else(|| post.content.as_ref().map(plain_text))
                    .map(|text| excerpt(&text, 120))
                    .unwrap_or_default();
                println!("{}  {}\n    {summary}", post.slug, post.title);
            }
            println!("\nPage {} of {}", posts.page, posts.total_pages);
        }
        Commands::Post { slug } => {
            let post = client.post_by_slug(&slug).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&post)?);
                return Ok(());
            }
            println!("{}\n", post.title);
            if let Some(content) = &post.content {
                println!("{}", plain_text(content));
            }
        }
        Commands::Export { out } => {
            info!("🔍 Fetching active jobs from {}", client.base_url());
            let jobs = client.all_active_jobs().await?;
            info!("📊 Total unique jobs found: {}", jobs.len());
            write_export(&out, &jobs)?;
            info!("💾 Saved {} jobs to {:?}", jobs.len(), out);
        }
    }

    Ok(())
}
