use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use starcluster_engine::catalog::{generate_cluster, Catalog, ClusterRequest};
use starcluster_engine::data::{
    read_catalog_from_file, write_catalog_to_file, write_metadata_to_file, CatalogMetadata,
};
use starcluster_engine::render::mode::{Limits2d, Limits3d};
use starcluster_engine::render::raster::{rasterize, save_png, RasterOptions};
use starcluster_engine::render::writer::write_stream_to_file;
use starcluster_engine::render::{MapRenderer, MapSettings, OrbitingBody, StreamFormat};
use starcluster_engine::rng::{ClusterRng, DEFAULT_SEED};

#[derive(Debug, Parser)]
#[command(name = "starcluster", about = "Generate and chart random star clusters")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create new assets
    Create {
        #[command(subcommand)]
        target: CreateTarget,
    },
    /// Render a stored catalog as a drawing-command stream
    Render(RenderArgs),
    /// Print the version
    Version,
}

#[derive(Debug, Subcommand)]
enum CreateTarget {
    /// Generate a cluster and write its image, catalog and maps
    Cluster(ClusterArgs),
}

#[derive(Debug, Args)]
struct ClusterArgs {
    #[arg(long, default_value_t = ClusterRequest::default().races)]
    races: u32,
    #[arg(long, default_value_t = ClusterRequest::default().systems_per_race)]
    systems_per_race: f64,
    /// Multiplier for the cluster radius
    #[arg(long, default_value_t = ClusterRequest::default().scale)]
    scale: f64,
    #[arg(long, default_value = DEFAULT_SEED)]
    seed: String,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Catalog bundle written by `create cluster`
    #[arg(long)]
    catalog: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// JSON map settings; flags below override it
    #[arg(long)]
    settings: Option<PathBuf>,
    /// JSON object of star index (furthest-first) to orbiting bodies
    #[arg(long)]
    orbits: Option<PathBuf>,
    #[arg(long, default_value = "text")]
    format: StreamFormat,
    #[arg(long)]
    collapse_x: bool,
    #[arg(long)]
    collapse_y: bool,
    #[arg(long)]
    collapse_z: bool,
    #[arg(long)]
    stereo: bool,
    #[arg(long)]
    three_d: bool,
    #[arg(long)]
    orbit: bool,
    #[arg(long)]
    show_name: bool,
    #[arg(long)]
    show_spectral_type: bool,
    #[arg(long)]
    show_collapsed_coordinate: bool,
    #[arg(long)]
    no_data_pages: bool,
    #[arg(long)]
    no_grid_lines: bool,
    #[arg(long)]
    vertical_reference: bool,
    /// Horizontal and vertical minimum, e.g. `33,44`
    #[arg(long, value_delimiter = ',', num_args = 2, allow_negative_numbers = true)]
    limits_2d: Option<Vec<i64>>,
    /// x, y and z minimum, e.g. `44,44,44`
    #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true)]
    limits_3d: Option<Vec<i64>>,
    #[arg(long)]
    map_width: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    plane_height: Option<i64>,
}

impl RenderArgs {
    fn settings(&self) -> Result<MapSettings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let raw = fs::read(path)
                    .with_context(|| format!("failed to read settings {}", path.display()))?;
                serde_json::from_slice(&raw)
                    .with_context(|| format!("failed to parse settings {}", path.display()))?
            }
            None => MapSettings::default(),
        };
        settings.collapse_x |= self.collapse_x;
        settings.collapse_y |= self.collapse_y;
        settings.collapse_z |= self.collapse_z;
        settings.stereo |= self.stereo;
        settings.three_d |= self.three_d;
        settings.orbit |= self.orbit;
        settings.show_name |= self.show_name;
        settings.show_spectral_type |= self.show_spectral_type;
        settings.show_collapsed_coordinate |= self.show_collapsed_coordinate;
        settings.suppress_data_pages |= self.no_data_pages;
        settings.suppress_grid_lines |= self.no_grid_lines;
        settings.show_vertical_reference |= self.vertical_reference;
        if let Some(l) = self.limits_2d.as_deref() {
            settings.limits_2d = Some(Limits2d { horizontal: l[0], vertical: l[1] });
        }
        if let Some(l) = self.limits_3d.as_deref() {
            settings.limits_3d = Some(Limits3d { x: l[0], y: l[1], z: l[2] });
        }
        settings.map_width = self.map_width.or(settings.map_width);
        settings.plane_height = self.plane_height.or(settings.plane_height);
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Create { target: CreateTarget::Cluster(args) } => create_cluster(&args),
        Command::Render(args) => render(&args),
        Command::Version => {
            println!("starcluster {}", starcluster_engine::VERSION);
            Ok(())
        }
    }
}

fn create_cluster(args: &ClusterArgs) -> Result<()> {
    let request = ClusterRequest {
        races: args.races,
        systems_per_race: args.systems_per_race,
        scale: args.scale,
    };
    request.validate()?;

    let mut rng = ClusterRng::from_seed_str(&args.seed);
    let catalog = generate_cluster(request.target_systems(), request.volume_tweak(), &mut rng)
        .context("failed to generate cluster")?;

    // Everything is rendered before the first file is written.
    let image = rasterize(&catalog, &RasterOptions::default())?;
    let maps = [
        ("cluster-flat.txt", MapSettings {
            limits_2d: Some(Limits2d { horizontal: 33, vertical: 44 }),
            map_width: Some(45),
            suppress_data_pages: true,
            ..Default::default()
        }),
        ("cluster-stereo.txt", MapSettings {
            stereo: true,
            suppress_data_pages: true,
            ..Default::default()
        }),
        ("cluster-3d.txt", MapSettings {
            limits_3d: Some(Limits3d { x: 44, y: 44, z: 44 }),
            map_width: Some(45),
            suppress_data_pages: true,
            ..Default::default()
        }),
    ];
    let mut streams = Vec::with_capacity(maps.len());
    for (name, settings) in &maps {
        let stream = MapRenderer::new(&catalog, settings)?
            .render()
            .with_context(|| format!("failed to render {name}"))?;
        streams.push((*name, stream));
    }

    let out_dir = &args.out_dir;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    save_png(&image, out_dir.join("cluster.png")).context("failed to write cluster.png")?;
    write_catalog_to_file(&catalog, out_dir.join("cluster.bin"))
        .context("failed to write cluster.bin")?;
    write_metadata_to_file(
        &CatalogMetadata::describe(&catalog, &args.seed),
        out_dir.join("cluster.meta.json"),
    )
    .context("failed to write cluster.meta.json")?;
    for (name, stream) in &streams {
        write_stream_to_file(stream, StreamFormat::Text, out_dir.join(name))
            .with_context(|| format!("failed to write {name}"))?;
    }

    info!(
        "Wrote {} with {} systems (radius {:.4} pc) to {}",
        catalog.name,
        catalog.len(),
        catalog.radius,
        out_dir.display()
    );
    Ok(())
}

fn render(args: &RenderArgs) -> Result<()> {
    let settings = args.settings()?;
    let catalog: Catalog = read_catalog_from_file(&args.catalog)
        .with_context(|| format!("failed to read catalog {}", args.catalog.display()))?;
    let mut renderer = MapRenderer::new(&catalog, &settings)?;
    if let Some(path) = &args.orbits {
        for (index, bodies) in load_orbits(path)? {
            renderer.attach_orbits(index, bodies)?;
        }
    }
    let stream = renderer.render()?;
    write_stream_to_file(&stream, args.format, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        "Wrote {} commands to {}",
        stream.len(),
        args.output.display()
    );
    Ok(())
}

fn load_orbits(path: &Path) -> Result<BTreeMap<usize, Vec<OrbitingBody>>> {
    let raw = fs::read(path).with_context(|| format!("failed to read orbits {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse orbits {}", path.display()))
}
