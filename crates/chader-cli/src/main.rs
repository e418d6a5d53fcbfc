//! Command-line entry point: inspect and rasterize scene documents.

use anyhow::{Context, Result, bail};
use chader_core::storage::{FileStorage, Storage};
use chader_core::{EditorConfig, Rgba, SceneGraph, persistence};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chader")]
#[command(about = "Inspect and render Chader scene documents")]
struct Args {
    /// Editor configuration (JSON). Missing fields use the defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rasterize a scene document to PNG
    Render {
        /// Scene document, or the name of a stored scene
        scene: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 800)]
        width: u32,

        #[arg(long, default_value_t = 600)]
        height: u32,

        /// Background color as #rrggbb
        #[arg(long, default_value = "#ffffff")]
        background: String,
    },
    /// Summarize the shapes in a scene document
    Info {
        /// Scene document, or the name of a stored scene
        scene: String,
    },
    /// List scenes in the local scene store
    List,
    /// Copy a scene document into the local scene store
    Import {
        file: PathBuf,

        /// Name to store it under (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Render {
            scene,
            output,
            width,
            height,
            background,
        } => {
            let background = Rgba::from_hex(&background).with_context(|| format!("invalid color {}", background))?;
            let scene = open_scene(&scene, config)?;
            let png = chader_render::render_scene_to_png(&scene, width, height, background.into())?;
            fs::write(&output, png).with_context(|| format!("failed to write {}", output.display()))?;
            println!("wrote {}", output.display());
        }
        Command::Info { scene } => {
            let scene = open_scene(&scene, config)?;
            print_info(&scene);
        }
        Command::List => {
            let storage = FileStorage::default_location()?;
            let mut names = storage.list()?;
            names.sort();
            for name in names {
                println!("{}", name);
            }
        }
        Command::Import { file, name } => {
            let json = fs::read_to_string(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let loaded = persistence::deserialize_with_config(&json, config)?;
            if !loaded.errors.is_empty() {
                bail!("{} has {} invalid records", file.display(), loaded.errors.len());
            }
            let name = match name {
                Some(name) => name,
                None => file
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .context("cannot derive a scene name from the file name")?,
            };
            let storage = FileStorage::default_location()?;
            chader_core::storage::save_scene(&storage, &name, &loaded.scene)?;
            println!("stored {} in {}", name, storage.base_path().display());
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::without_fade());
    };
    let json = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut config = EditorConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))?;
    // Offline rendering has no frame clock to run the fade.
    config.fade.enabled = false;
    Ok(config)
}

/// Load a scene from a file path, falling back to the local scene store.
fn open_scene(source: &str, config: EditorConfig) -> Result<SceneGraph> {
    let path = Path::new(source);
    let json = if path.is_file() {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        FileStorage::default_location()?
            .load(source)
            .with_context(|| format!("no scene file or stored scene named {}", source))?
    };

    let mut scene = SceneGraph::with_config(config);
    let errors = scene.load_json(&json)?;
    for error in &errors {
        log::warn!("{}", error);
    }
    Ok(scene)
}

fn print_info(scene: &SceneGraph) {
    println!("{} shapes", scene.len());
    for shape in scene.shapes() {
        let t = &shape.transform;
        println!(
            "{:>4}  {:<9}  {:>3} vertices  {:<8}  at ({:.2}, {:.2}) rot {:.1} scale ({:.2}, {:.2})",
            shape.id().to_string(),
            shape.kind(),
            shape.vertices().len(),
            if shape.is_regular() { "regular" } else { "freehand" },
            t.translation.x,
            t.translation.y,
            t.rotation_degrees(),
            t.scale.x,
            t.scale.y,
        );
    }
}
