use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use worldmap::render::FillMode;
use worldmap::{MapError, MapGenerator, WorldGenerationParams, WorldMap, render};

/// Генератор карт провинций и наций для Chronicles of Realms
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (иначе — значения по умолчанию)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ширина карты
    #[arg(long)]
    width: Option<f64>,

    /// Высота карты
    #[arg(long)]
    height: Option<f64>,

    /// Число провинций
    #[arg(short, long)]
    provinces: Option<usize>,

    /// Число наций
    #[arg(short, long)]
    nations: Option<usize>,

    /// Сид генератора
    #[arg(short, long)]
    seed: Option<String>,

    /// Путь для сохранения карты в JSON (по умолчанию: ./map.json)
    #[arg(short, long, default_value = "map.json")]
    output: PathBuf,

    /// Путь для сохранения PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Заливать провинции цветом ландшафта вместо цвета нации
    #[arg(long)]
    terrain: bool,

    /// Пикселей на единицу длины карты в PNG
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Сгенерировать пачку из N карт с сидами `<seed>-<i>`
    #[arg(long)]
    batch: Option<usize>,
}

impl Cli {
    fn params(&self) -> Result<WorldGenerationParams, MapError> {
        let mut params = match &self.config {
            Some(path) => WorldGenerationParams::from_toml_file(path)?,
            None => WorldGenerationParams::default(),
        };
        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(height) = self.height {
            params.height = height;
        }
        if let Some(provinces) = self.provinces {
            params.province_count = provinces;
        }
        if let Some(nations) = self.nations {
            params.nation_count = nations;
        }
        if let Some(seed) = &self.seed {
            params.seed = Some(seed.clone());
        }
        Ok(params)
    }
}

fn run_batch(
    generator: &Arc<MapGenerator>,
    params: &WorldGenerationParams,
    count: usize,
) -> Result<Vec<Arc<WorldMap>>, MapError> {
    let base = params.seed.clone().unwrap_or_else(worldmap::rng::fresh_seed);
    let jobs: Vec<WorldGenerationParams> = (0..count)
        .map(|i| params.clone().with_seed(format!("{base}-{i}")))
        .collect();

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        jobs.par_iter()
            .map(|job| generator.generate_world(job))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        jobs.iter().map(|job| generator.generate_world(job)).collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let params = cli.params()?;
    let generator = Arc::new(MapGenerator::new());

    if let Some(count) = cli.batch {
        println!("Генерация пачки из {count} карт...");
        let maps = run_batch(&generator, &params, count)?;
        for map in &maps {
            println!(
                "  {} — сид {:?}, {} провинций, {} границ",
                map.id,
                map.seed,
                map.provinces.len(),
                map.borders.len()
            );
        }
        println!("В реестре карт: {}", generator.list_maps().len());
        return Ok(());
    }

    println!(
        "Генерация карты (размер: {}×{}, провинций: {}, наций: {})...",
        params.width, params.height, params.province_count, params.nation_count
    );
    let map = generator.generate_world(&params)?;

    for nation in map.nations() {
        println!(
            "  Нация {} «{}»: {} провинций, население {}",
            nation.id,
            nation.name,
            nation.province_ids.len(),
            nation.population
        );
    }

    println!("Сохранение в {:?}", cli.output);
    map.save_json(&cli.output)?;

    if let Some(png) = &cli.png {
        println!("Сохранение изображения в {png:?}");
        let mode = if cli.terrain {
            FillMode::Terrain
        } else {
            FillMode::Nations
        };
        render::save_png(&map, png, cli.scale, mode)?;
    }

    println!("\nГотово! Карта {} (сид {:?}).", map.id, map.seed);
    Ok(())
}
