use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;

use atomos::atom::encode_draft;
use atomos::security::{Credential, WSSE_HEADER};

const ENTRY_MEDIA_TYPE: &str = "application/atom+xml;type=entry";

#[derive(Parser)]
#[command(name = "atompub-cli")]
#[command(about = "AtomPub client for an Atomos blog", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4567")]
    url: String,

    #[arg(long, default_value = "admin")]
    username: String,

    #[arg(short, long, default_value = "password")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the collection feed
    List,
    /// Print one entry, e.g. `get 2024/03/05/hello-world`
    Get { path: String },
    /// Create an entry
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Overwrite the given fields of an entry
    Put {
        path: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete an entry
    Delete { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');
    let member = |path: &str| format!("{}/atom/{}", base, path.trim_matches('/'));

    let (method, url, body, slug) = match cli.command {
        Commands::List => (Method::GET, format!("{}/atom/", base), None, None),
        Commands::Get { path } => (Method::GET, member(&path), None, None),
        Commands::Post { title, content, tags, slug } => {
            let xml = encode_draft(Some(title.as_str()), Some(content.as_str()), &tags)?;
            (Method::POST, format!("{}/atom/", base), Some(xml), slug)
        }
        Commands::Put { path, title, content, tags } => {
            let xml = encode_draft(title.as_deref(), content.as_deref(), &tags)?;
            (Method::PUT, member(&path), Some(xml), None)
        }
        Commands::Delete { path } => (Method::DELETE, member(&path), None, None),
    };

    let mut headers = HeaderMap::new();
    let token = Credential::issue_now(&cli.username, &cli.password).to_header();
    headers.insert(WSSE_HEADER, HeaderValue::from_str(&token)?);
    if let Some(slug) = slug {
        headers.insert("slug", HeaderValue::from_str(&slug)?);
    }
    if body.is_some() {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ENTRY_MEDIA_TYPE));
    }

    let mut request = client.request(method, &url).headers(headers);
    if let Some(body) = body {
        request = request.body(body);
    }
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let location = res
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if let Some(location) = location {
        println!("Location: {}", location);
    }
    if !text.is_empty() {
        println!("{}", text);
    }
    Ok(())
}
