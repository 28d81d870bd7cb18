use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use directories::ProjectDirs;
use serde::Serialize;
use serde_json::json;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use folio::cloudinary::Cloudinary;
use folio::config::Config;
use folio::filter::empty_message;
use folio::{
  ALL_CATEGORIES, Fetched, Gateway, MediaItem, MediaKind, ModalViewer, ThumbnailQuality, categories_of,
  fetch_gallery_groups, filter, to_embed_url, to_thumbnail_url,
};

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Print results as JSON
  #[arg(long, global = true)]
  json: bool,

  /// Also log to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List services
  Services,
  /// List clients
  Clients,
  /// List projects, optionally narrowed to one category
  Projects {
    #[arg(short, long, default_value = ALL_CATEGORIES)]
    category: String,
  },
  /// List project categories
  Categories,
  /// List featured projects
  Featured,
  /// List gallery groups with their media
  Gallery,
  /// Print the embeddable player URL for a video reference
  Embed { reference: String },
  /// Print the thumbnail URL for a video reference
  Thumbnail {
    reference: String,
    #[arg(short, long, value_enum, default_value_t = ThumbnailQuality::HqDefault)]
    quality: ThumbnailQuality,
  },
  /// Open a media source in the viewer and print how it renders
  View {
    src: String,
    /// Treat the source as an image rather than a video
    #[arg(long)]
    image: bool,
  },
  /// Print a responsive image CDN URL for a public id
  Image {
    public_id: String,
    #[arg(short, long, default_value_t = 800)]
    width: u32,
  },
  /// Store backend credentials in the preferences file
  Configure {
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    key: Option<String>,
    #[arg(long)]
    cloud: Option<String>,
  },
  /// Generate shell completions
  Completions { shell: Shell },
}

// --- Logging ---

/// File logging under the platform data dir, plus stderr when verbose.
/// The returned guard flushes the file writer on drop.
fn init_tracing(verbose: bool) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("folio=info"));

  let file = ProjectDirs::from("", "", "folio").and_then(|dirs| {
    let log_dir = dirs.data_local_dir().join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, "folio.log")))
  });
  let (file_layer, guard) = match file {
    Some((writer, guard)) => (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard)),
    None => (None, None),
  };
  let stderr_layer = verbose.then(|| fmt::layer().with_writer(std::io::stderr));

  tracing_subscriber::registry().with(filter).with(file_layer).with(stderr_layer).init();
  guard
}

// --- Output ---

fn print_json(value: &impl Serialize) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
  Ok(())
}

fn note_degraded<T>(fetched: &Fetched<T>) {
  if let Some(reason) = fetched.degrade_reason() {
    eprintln!("note: showing fallback content ({reason})");
  }
}

fn print_fetched<T: Serialize>(fetched: &Fetched<T>, json: bool, line: impl Fn(&T) -> String) -> Result<()> {
  if json {
    return print_json(&json!({ "items": fetched.items(), "degraded": fetched.is_degraded() }));
  }
  note_degraded(fetched);
  if fetched.items().is_empty() {
    println!("(none)");
  }
  for item in fetched.items() {
    println!("{}", line(item));
  }
  Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
  value.unwrap_or("-")
}

// --- Main ---

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _guard = init_tracing(args.verbose);
  run(args).await
}

async fn run(args: Args) -> Result<()> {
  let config = Config::load();
  let json = args.json;

  match args.command {
    Command::Services => {
      let gateway = Gateway::connect(&config);
      let services = gateway.services().await;
      print_fetched(&services, json, |s| format!("{:>4}  {}  [{}]  {}", s.id, s.title, s.icon(), s.details.join(", ")))
    }
    Command::Clients => {
      let gateway = Gateway::connect(&config);
      let clients = gateway.clients().await;
      print_fetched(&clients, json, |c| format!("{:>4}  {}  {}", c.id, c.name, or_dash(c.industry.as_deref())))
    }
    Command::Projects { category } => {
      let gateway = Gateway::connect(&config);
      let projects = gateway.projects().await;
      let selected = filter(projects.items(), &category);
      if json {
        return print_json(&json!({ "items": selected, "degraded": projects.is_degraded() }));
      }
      note_degraded(&projects);
      if selected.is_empty() {
        println!("{}", empty_message(&category, projects.is_degraded()));
      }
      for p in selected {
        let thumb = p.display_thumbnail();
        println!("{:>4}  {}  [{}]  {}", p.id, p.title, or_dash(p.category.as_deref()), or_dash(thumb.as_deref()));
      }
      Ok(())
    }
    Command::Categories => {
      let gateway = Gateway::connect(&config);
      let projects = gateway.projects().await;
      let categories = categories_of(projects.items());
      if json {
        return print_json(&json!({ "items": categories, "degraded": projects.is_degraded() }));
      }
      note_degraded(&projects);
      println!("{}", categories.join("\n"));
      Ok(())
    }
    Command::Featured => {
      let gateway = Gateway::connect(&config);
      let featured = gateway.featured_projects().await;
      print_fetched(&featured, json, |p| {
        format!("{:>4}  {}  {}", p.id, p.title, or_dash(p.display_thumbnail().as_deref()))
      })
    }
    Command::Gallery => {
      let gateway = Gateway::connect(&config);
      let gallery = fetch_gallery_groups(&gateway).await;
      print_fetched(&gallery, json, |group| {
        let mut out = format!("{}  {}", group.client_name, group.description);
        for item in &group.media {
          let kind = match item.kind {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
          };
          let thumb = item.display_thumbnail();
          out.push_str(&format!("\n  [{kind}] {}  {}", or_dash(item.title.as_deref()), or_dash(thumb.as_deref())));
        }
        out
      })
    }
    Command::Embed { reference } => {
      let url = to_embed_url(&reference).ok_or_else(|| anyhow!("not a recognizable video reference: {reference}"))?;
      println!("{url}");
      Ok(())
    }
    Command::Thumbnail { reference, quality } => {
      let url = to_thumbnail_url(&reference, quality)
        .ok_or_else(|| anyhow!("not a recognizable video reference: {reference}"))?;
      println!("{url}");
      Ok(())
    }
    Command::View { src, image } => {
      let kind = if image { MediaKind::Image } else { MediaKind::Video };
      let mut viewer = ModalViewer::new();
      viewer.open(MediaItem { id: 0, kind, title: None, src, thumbnail: None });
      let render = viewer.render_mode().context("viewer opened without a render mode")?;
      if json {
        return print_json(render);
      }
      println!("{render:?}");
      Ok(())
    }
    Command::Image { public_id, width } => {
      let cdn = Cloudinary::from_config(&config)
        .with_context(|| format!("no image CDN configured; set {}", folio::config::ENV_CLOUDINARY_CLOUD))?;
      println!("{}", cdn.responsive_url(&public_id, width));
      println!("{}", cdn.placeholder_url(&public_id));
      Ok(())
    }
    Command::Configure { url, key, cloud } => {
      let mut prefs = Config::load_file();
      if url.is_some() {
        prefs.backend_url = url;
      }
      if key.is_some() {
        prefs.backend_key = key;
      }
      if cloud.is_some() {
        prefs.cloudinary_cloud_name = cloud;
      }
      let path = prefs.save()?;
      let status = if prefs.backend().is_configured() { "configured" } else { "not configured (fallback content)" };
      println!("saved {}; backend {status}", path.display());
      Ok(())
    }
    Command::Completions { shell } => {
      clap_complete::generate(shell, &mut Args::command(), "folio", &mut std::io::stdout());
      Ok(())
    }
  }
}
