// src/generator.rs
//! Оркестратор генерации и реестр карт
//!
//! ## Конвейер
//!
//! сид → точки → тесселяция → провинции → нации → границы → `WorldMap` → реестр
//!
//! Все случайные решения берутся из одного `MapRng`, созданного под вызов.
//! Порядок потребления фиксирован, поэтому карта полностью определяется
//! параметрами и сидом.
//!
//! ## Реестр
//!
//! `MapGenerator` владеет хранилищем `MapStore`. По умолчанию это
//! `InMemoryStore` без вытеснения: карты живут до конца процесса.
//! Генерация идёт вне блокировки, под записью — только вставка.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::border::synthesize_borders;
use crate::config::WorldGenerationParams;
use crate::error::MapError;
use crate::nation::grow_nations;
use crate::province::factory::build_provinces;
use crate::province::graph::count_components;
use crate::rng::{fresh_seed, map_id, rng_from_seed};
use crate::tessellation::{sample_points, tessellate};
use crate::world::{MAP_FORMAT_VERSION, MapMetadata, MapStats, WorldMap};

/// Результат одного прогона: карта и её диагностика.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub map: WorldMap,
    pub stats: MapStats,
}

/// Запускает конвейер без обращения к реестру.
pub fn generate_map(params: &WorldGenerationParams) -> Result<GenerationOutcome, MapError> {
    params.validate()?;

    let seed = params.seed.clone().unwrap_or_else(fresh_seed);
    let mut rng = rng_from_seed(&seed);

    let sites = sample_points(params.width, params.height, params.province_count, &mut rng);
    let tessellation = tessellate(&sites, params.width, params.height);
    let mut provinces = build_provinces(&tessellation.cells, &params.population, &mut rng);
    let growth = grow_nations(&mut provinces, params.nation_count, &mut rng)?;
    let borders = synthesize_borders(&provinces, &params.borders, &mut rng);

    let stats = MapStats {
        requested_provinces: params.province_count,
        provinces: provinces.len(),
        nations: growth.capitals.len(),
        borders: borders.borders.len(),
        tessellation_gaps: tessellation.gaps,
        unreachable_provinces: growth.unreachable.len(),
        border_gaps: borders.gaps,
        components: count_components(&provinces),
    };

    let map = WorldMap {
        id: map_id(),
        width: params.width,
        height: params.height,
        seed,
        provinces,
        borders: borders.borders,
        metadata: MapMetadata {
            generated_at: chrono::Utc::now(),
            version: MAP_FORMAT_VERSION.to_string(),
        },
    };
    Ok(GenerationOutcome { map, stats })
}

/// Хранилище сгенерированных карт.
pub trait MapStore: Send + Sync {
    fn insert(&self, map: Arc<WorldMap>);
    fn get(&self, id: &str) -> Option<Arc<WorldMap>>;
    /// Все id в порядке добавления
    fn ids(&self) -> Vec<String>;
}

#[derive(Debug, Default)]
struct StoreInner {
    maps: HashMap<String, Arc<WorldMap>>,
    order: Vec<String>,
}

/// Реестр в памяти процесса. Растёт без ограничений.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MapStore for InMemoryStore {
    fn insert(&self, map: Arc<WorldMap>) {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        match inner.maps.entry(map.id.clone()) {
            Entry::Occupied(_) => {
                warn!("Карта {} уже в реестре, новая отброшена", map.id);
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&map));
                inner.order.push(map.id.clone());
            }
        }
    }

    fn get(&self, id: &str) -> Option<Arc<WorldMap>> {
        self.inner.read().maps.get(id).cloned()
    }

    fn ids(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }
}

/// Генератор карт с собственным реестром.
///
/// Методы принимают `&self`, так что генератор можно делить между потоками
/// через `Arc<MapGenerator>`.
#[derive(Debug, Default)]
pub struct MapGenerator<S: MapStore = InMemoryStore> {
    store: S,
}

impl MapGenerator<InMemoryStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: MapStore> MapGenerator<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Генерирует карту, кладёт её в реестр и возвращает.
    pub fn generate_world(
        &self,
        params: &WorldGenerationParams,
    ) -> Result<Arc<WorldMap>, MapError> {
        let GenerationOutcome { map, stats } = generate_map(params)?;
        info!(
            "Карта {} (сид {:?}): {} провинций из {}, {} наций, {} границ",
            map.id,
            map.seed,
            stats.provinces,
            stats.requested_provinces,
            stats.nations,
            stats.borders
        );

        let map = Arc::new(map);
        self.store.insert(Arc::clone(&map));
        Ok(map)
    }

    pub fn get_map(&self, id: &str) -> Result<Arc<WorldMap>, MapError> {
        self.store
            .get(id)
            .ok_or_else(|| MapError::NotFound(id.to_string()))
    }

    #[must_use]
    pub fn list_maps(&self) -> Vec<String> {
        self.store.ids()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
