mod output;

use std::{
    fmt::Display,
    path::PathBuf,
    str::FromStr,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use lumen::{
    integrators::{DirectLighting, Integrator, Options, PathTracer, SamplerIntegrator},
    sampler::SamplerType,
    scene::{
        examples::{CornellBox, Spheres},
        Scene,
    },
    utils::{counter, timer::timed_scope_log},
};

#[derive(Parser, Debug)]
pub struct Args {
    #[arg(long = "spp", default_value_t = 32)]
    /// Samples per pixel
    sample_per_pixel: u32,

    #[arg(short, long, default_value = "800x600")]
    /// Image dimension in format `width`x`height`
    dimensions: Dimensions,

    #[arg(long, value_enum, default_value_t)]
    /// Scene selector
    scene: AvailableScene,

    #[arg(short, long, value_enum, default_value_t)]
    integrator: AvailableIntegrator,

    #[arg(long, value_enum, default_value_t)]
    sampler: AvailableSampler,

    #[arg(long, default_value_t = 5)]
    /// Upper bound on path length
    max_depth: u32,

    #[arg(long, default_value_t = 3)]
    /// Depth below which Russian roulette is disabled
    min_depth: u32,

    #[arg(long, default_value_t = 1e4)]
    /// Per-channel radiance clamp, suppresses fireflies
    max_ray_intensity: f32,

    #[arg(long)]
    /// Fixed base seed; renders become reproducible
    seed: Option<u64>,

    #[arg(long, default_value_t = 2)]
    /// Seconds between preview snapshots; 0 disables previews
    save_every_second: u64,

    #[arg(short, long, default_value = "output")]
    /// Directory receiving hdr/ and ldr/ images
    output: PathBuf,

    #[arg(long, default_value_t = false)]
    disable_threading: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Dimensions {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut split_it = s.split('x');
        let (Some(a), Some(b)) = (split_it.next(), split_it.next()) else {
            return Err(anyhow::anyhow!("Incorrect format, see help"));
        };
        let width: u32 = a.parse()?;
        let height: u32 = b.parse()?;

        Ok(Dimensions { width, height })
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}x{}", self.width, self.height))
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableScene {
    #[default]
    CornellBox,
    Spheres,
}

impl AvailableScene {
    fn build(self, dimensions: Dimensions) -> Scene {
        match self {
            AvailableScene::CornellBox => CornellBox::build(dimensions.width, dimensions.height),
            AvailableScene::Spheres => Spheres::build(dimensions.width, dimensions.height),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableIntegrator {
    Direct,
    #[default]
    Path,
}

#[derive(Debug, Default, Clone, Copy, ValueEnum)]
pub enum AvailableSampler {
    Independent,
    Stratified,
    #[default]
    Sobol,
}

impl From<AvailableSampler> for SamplerType {
    fn from(sampler: AvailableSampler) -> Self {
        match sampler {
            AvailableSampler::Independent => SamplerType::Independent,
            AvailableSampler::Stratified => SamplerType::Stratified,
            AvailableSampler::Sobol => SamplerType::Sobol,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.disable_threading {
        log::warn!("Working on only one thread");
        rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build_global()?;
    }

    let scene = args.scene.build(args.dimensions);

    if args.save_every_second > 0 {
        let period = Duration::from_secs(args.save_every_second);
        let preview_path = args.output.join("preview.png");
        let mut last_saved: Option<Instant> = None;
        scene.set_preview(move |film| {
            if last_saved.is_some_and(|at| at.elapsed() < period) {
                return;
            }
            match output::save_preview(film, &preview_path) {
                Ok(()) => last_saved = Some(Instant::now()),
                Err(err) => log::warn!("preview snapshot failed: {err}"),
            }
        });
    }

    let radiance: Box<dyn Integrator> = match args.integrator {
        AvailableIntegrator::Direct => Box::new(DirectLighting),
        AvailableIntegrator::Path => Box::new(PathTracer {
            max_depth: args.max_depth,
            min_depth: args.min_depth,
        }),
    };

    let driver = SamplerIntegrator::new(
        radiance,
        Options {
            samples_per_pixel: args.sample_per_pixel,
            max_depth: args.max_depth,
            min_depth: args.min_depth,
            max_ray_intensity: args.max_ray_intensity,
            sampler: args.sampler.into(),
            seed: args.seed,
        },
    );

    timed_scope_log("Run tile renderer", || driver.render(&scene)).res?;

    output::save_outputs(&scene.film().develop(), &args.output)?;

    log::info!("Done");
    counter::report_counters();
    Ok(())
}
