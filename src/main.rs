use clap::{Parser, Subcommand};
use simple_comments::config::{self, CommentsConfig};
use simple_comments::output;
use simple_comments::post::{self, PostComments};
use simple_comments::render::CommentRenderer;
use simple_comments::types::Severity;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "simple-comments")]
#[command(about = "Threaded comments for static sites")]
#[command(long_about = "\
Threaded comments for static sites

Each post has a directory of comment files. The filename gives the time and
an opaque author token, the JSON content gives the author name and text.

Content structure:

  site/
  ├── comments.toml                       # Optional config
  └── comments/
      └── hello-world/                    # Post slug
          ├── 20230101120000_a1b2c3.json  # {\"author\": \"Ada\", \"text\": \"...\"}
          └── 20230101130000_d4e5f6.json  # {..., \"in_reply_to\": \"20230101120000_a1b2c3\"}

Files that cannot be read are skipped and reported; they never stop a run.
Set RUST_LOG=info (or debug) for more detail.

Run 'simple-comments gen-config' to generate a documented comments.toml.")]
#[command(version)]
struct Cli {
    /// Content root (holds comments.toml and the comments directory)
    #[arg(long, default_value = ".", global = true)]
    content: PathBuf,

    /// Comments base directory, overrides `comments_path` from the config
    #[arg(long, global = true)]
    comments_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the comment tree of one post
    Show { slug: String },
    /// Print the template metadata (`comments`, `num_comments`) as JSON
    Json { slug: String },
    /// Print the comments of one post as an HTML fragment
    Render { slug: String },
    /// Load every post and report counts and skipped files
    Check,
    /// Print a stock comments.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let content = cli.content;
    let comments_path = cli.comments_path;
    let load = || -> Result<(CommentsConfig, PathBuf), config::ConfigError> {
        let config = config::load_config(&content)?;
        let base_dir = resolve_base_dir(&content, comments_path.as_deref(), &config);
        tracing::debug!(base_dir = %base_dir.display(), "resolved comments directory");
        Ok((config, base_dir))
    };

    match cli.command {
        Command::Show { slug } => {
            let (config, base_dir) = load()?;
            let post = post::load_post_comments(&base_dir, &slug, &config.extension);
            log_diagnostics(&post);
            output::print_post_output(&post);
        }
        Command::Json { slug } => {
            let (config, base_dir) = load()?;
            let post = post::load_post_comments(&base_dir, &slug, &config.extension);
            log_diagnostics(&post);
            println!("{}", serde_json::to_string_pretty(&post.metadata())?);
        }
        Command::Render { slug } => {
            let (config, base_dir) = load()?;
            let renderer = CommentRenderer::new(&config.render)?;
            let post = post::load_post_comments(&base_dir, &slug, &config.extension);
            log_diagnostics(&post);
            println!("{}", renderer.render(&post).into_string());
        }
        Command::Check => {
            let (config, base_dir) = load()?;
            let posts = post::scan_all_posts(&base_dir, &config.extension)?;
            posts.iter().for_each(log_diagnostics);
            output::print_check_output(&posts);
            if posts.iter().any(PostComments::has_errors) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Diagnostics go to stderr through `tracing`; `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn log_diagnostics(post: &PostComments) {
    for d in &post.diagnostics {
        match d.severity() {
            Severity::Error => tracing::error!(
                post = %post.slug,
                path = %d.path.display(),
                "skipped comment: {}",
                d.error
            ),
            Severity::Warning => tracing::warn!(
                post = %post.slug,
                path = %d.path.display(),
                "skipped file: {}",
                d.error
            ),
        }
    }
    tracing::info!(post = %post.slug, num_comments = post.num_comments, "loaded comments");
}

/// `--comments-path` wins over the config; relative paths are resolved
/// against the content root either way.
fn resolve_base_dir(
    content: &Path,
    comments_path: Option<&Path>,
    config: &CommentsConfig,
) -> PathBuf {
    match comments_path {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => content.join(path),
        None => config.comments_dir(content),
    }
}
