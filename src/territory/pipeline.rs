// src/territory/pipeline.rs

use crate::math::{
    Point2D,
    algorithms::{BoundedClipper, ClippedPolygon},
    error::MathResult,
    voronoi::{FiniteRegionReconstructor, FiniteVoronoi, GeometryConfig, PlanarVoronoiBuilder},
};
use crate::territory::{
    area::{AreaAggregator, CellMeasurement, TerritoryTotals},
    config::PipelineConfig,
    error::{RegionError, TerritoryError, TerritoryResult},
    points::OwnedPoint,
    sink::AreaSink,
    source::PointSource,
};
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Wann Zyklen laufen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Genau ein Zyklus.
    Once,
    /// Ein Zyklus je `period` (Start zu Start, ohne Überlappung).
    /// `max_cycles = None` läuft endlos.
    Interval {
        period: Duration,
        max_cycles: Option<usize>,
    },
}

/// Territorium eines einzelnen Eingabepunkts.
#[derive(Debug, Clone)]
pub struct TerritoryCell {
    pub index: usize,
    pub owner: String,
    pub site: Point2D,
    pub polygon: ClippedPolygon,
    pub measurement: CellMeasurement,
}

/// Punkt ohne Beitrag in diesem Zyklus.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    pub index: usize,
    pub owner: String,
    pub reason: RegionError,
}

/// Ergebnis der Geometrie eines Zyklus.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub totals: TerritoryTotals,
    pub cells: Vec<TerritoryCell>,
    pub skipped: Vec<SkippedPoint>,
}

impl CycleReport {
    /// Summe der geclippten Flächen in Grad², vor der Breitenkorrektur.
    pub fn total_area_deg2(&self) -> f64 {
        self.cells.iter().map(|c| c.measurement.area_deg2).sum()
    }
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// Die Quelle lieferte keine Punkte; nichts veröffentlicht.
    NoData,
    Published(CycleReport),
    /// Zyklus abgebrochen; die Senke wurde nicht angefasst.
    Failed(TerritoryError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub published: usize,
    pub no_data: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::NoData => self.no_data += 1,
            CycleOutcome::Published(_) => self.published += 1,
            CycleOutcome::Failed(_) => self.failed += 1,
        }
    }
}

type PublishHook = Box<dyn FnMut(&CycleReport)>;

/// Fetch → Build → Reconstruct → Clip → Measure & Aggregate → Publish.
pub struct TerritoryPipeline<S, K> {
    config: PipelineConfig,
    source: S,
    sink: K,
    on_published: Option<PublishHook>,
}

impl<S, K> fmt::Debug for TerritoryPipeline<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerritoryPipeline")
            .field("config", &self.config)
            .field("on_published", &self.on_published.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: PointSource, K: AreaSink> TerritoryPipeline<S, K> {
    pub fn new(config: PipelineConfig, source: S, sink: K) -> TerritoryResult<Self> {
        config.geometry.validate()?;
        Ok(Self {
            config,
            source,
            sink,
            on_published: None,
        })
    }

    /// Wird nach jeder erfolgreichen Veröffentlichung aufgerufen.
    pub fn on_published(mut self, hook: impl FnMut(&CycleReport) + 'static) -> Self {
        self.on_published = Some(Box::new(hook));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Reine Geometrie eines Zyklus, ohne Quelle und Senke.
    pub fn compute(&self, points: &[OwnedPoint]) -> MathResult<CycleReport> {
        compute_territories(&self.config.geometry, points)
    }

    /// Führt einen vollständigen Zyklus aus. Veröffentlicht wird nur als letzter Schritt.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let started = Instant::now();
        match self.try_cycle() {
            Ok(Some(report)) => {
                info!(
                    "Cycle published: {} owners, {} cells, {} points skipped in {:?}",
                    report.totals.len(),
                    report.cells.len(),
                    report.skipped.len(),
                    started.elapsed()
                );
                if let Some(hook) = self.on_published.as_mut() {
                    hook(&report);
                }
                CycleOutcome::Published(report)
            }
            Ok(None) => {
                info!("No data found, nothing published this cycle.");
                CycleOutcome::NoData
            }
            Err(e) => {
                error!("Cycle failed, previous results stay in place: {e}");
                CycleOutcome::Failed(e)
            }
        }
    }

    fn try_cycle(&mut self) -> TerritoryResult<Option<CycleReport>> {
        let points = self.source.fetch()?;
        if points.is_empty() {
            return Ok(None);
        }
        debug!("Fetched {} claim points", points.len());

        let report = self.compute(&points)?;
        self.sink.replace_all(&report.totals)?;
        Ok(Some(report))
    }

    /// Führt Zyklen gemäß `schedule` aus. Fehlgeschlagene Zyklen werden nicht
    /// wiederholt; der nächste planmäßige Zyklus beginnt wieder von vorn.
    pub fn run(&mut self, schedule: Schedule) -> RunSummary {
        let mut summary = RunSummary::default();
        match schedule {
            Schedule::Once => {
                let outcome = self.run_cycle();
                summary.record(&outcome);
            }
            Schedule::Interval { period, max_cycles } => loop {
                let started = Instant::now();
                let outcome = self.run_cycle();
                summary.record(&outcome);
                if max_cycles.is_some_and(|max| summary.cycles >= max) {
                    break;
                }
                if let Some(rest) = period.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            },
        }
        summary
    }
}

/// Build → Reconstruct → Clip → Measure & Aggregate für eine Punktmenge.
///
/// Fehler beim Aufbau des Diagramms brechen ab; Probleme einzelner Punkte
/// landen in `CycleReport::skipped`.
pub fn compute_territories(
    config: &GeometryConfig,
    points: &[OwnedPoint],
) -> MathResult<CycleReport> {
    config.validate()?;
    let positions: Vec<Point2D> = points.iter().map(|p| p.position).collect();

    let diagram = PlanarVoronoiBuilder::new().build(&positions)?;
    let reconstructor =
        FiniteRegionReconstructor::new(config.radius_for(&positions))?.covering(config.bounds);
    let finite = reconstructor.reconstruct(&diagram);
    let clipper = BoundedClipper::new(config.bounds);
    let mut aggregator = AreaAggregator::new(config.miles_per_degree_lat);

    let mut cells = Vec::with_capacity(points.len());
    let mut skipped = Vec::new();
    for (index, point) in points.iter().enumerate() {
        let measured = clipped_territory(&finite, &clipper, index).and_then(|polygon| {
            aggregator
                .add(&point.owner, &polygon)
                .map(|measurement| (polygon, measurement))
                .ok_or(RegionError::ZeroArea)
        });

        match measured {
            Ok((polygon, measurement)) => cells.push(TerritoryCell {
                index,
                owner: point.owner.clone(),
                site: point.position,
                polygon,
                measurement,
            }),
            Err(reason) => {
                warn!(
                    "Skipping owner {} (point #{} at {:?}): {}",
                    point.owner, index, point.position, reason
                );
                skipped.push(SkippedPoint {
                    index,
                    owner: point.owner.clone(),
                    reason,
                });
            }
        }
    }

    Ok(CycleReport {
        totals: aggregator.finish(),
        cells,
        skipped,
    })
}

fn clipped_territory(
    finite: &FiniteVoronoi,
    clipper: &BoundedClipper,
    index: usize,
) -> Result<ClippedPolygon, RegionError> {
    let polygon = finite.polygon(index)?;
    if polygon.len() < 3 {
        return Err(RegionError::TooFewVertices {
            count: polygon.len(),
        });
    }
    let clipped = clipper.clip(&polygon);
    if clipped.is_empty() {
        return Err(RegionError::EmptyClip);
    }
    Ok(clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{MathError, types::Bounds2D};
    use crate::territory::{
        error::{SinkError, SourceError},
        sink::MemorySink,
        source::MemorySource,
    };
    use approx::assert_relative_eq;
    use geo::{Area, LineString, Polygon, coord};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::cell::Cell;
    use std::rc::Rc;

    fn area(points: &[Point2D]) -> f64 {
        Polygon::new(LineString::from(points.to_vec()), vec![]).unsigned_area()
    }

    fn square_points() -> Vec<OwnedPoint> {
        vec![
            OwnedPoint::new("sw", 0.0, 0.0),
            OwnedPoint::new("se", 1.0, 0.0),
            OwnedPoint::new("nw", 0.0, 1.0),
            OwnedPoint::new("ne", 1.0, 1.0),
        ]
    }

    fn random_points(seed: u64, count: usize) -> Vec<OwnedPoint> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| {
                OwnedPoint::new(
                    format!("owner{}", i % 7),
                    rng.random_range(-170.0..170.0),
                    rng.random_range(-80.0..80.0),
                )
            })
            .collect()
    }

    fn memory_pipeline(points: Vec<OwnedPoint>) -> TerritoryPipeline<MemorySource, MemorySink> {
        TerritoryPipeline::new(PipelineConfig::default(), MemorySource::new(points), MemorySink::new())
            .unwrap()
    }

    #[test]
    fn square_partitions_the_world() {
        let report = compute_territories(&GeometryConfig::default(), &square_points()).unwrap();
        assert_eq!(report.cells.len(), 4);
        assert!(report.skipped.is_empty());
        assert_relative_eq!(report.total_area_deg2(), 64800.0, max_relative = 1e-9);

        // Jede Ecke besitzt ein achsenparalleles Viertel der Welt
        let sw = &report.cells[0];
        assert_eq!(sw.owner, "sw");
        assert_relative_eq!(sw.measurement.area_deg2, 180.5 * 90.5, max_relative = 1e-9);
        let ne = &report.cells[3];
        assert_relative_eq!(ne.measurement.area_deg2, 179.5 * 89.5, max_relative = 1e-9);
    }

    #[test]
    fn random_cloud_partitions_the_bounds() {
        let config = GeometryConfig::default();
        let points = random_points(42, 60);
        let report = compute_territories(&config, &points).unwrap();

        assert!(report.skipped.is_empty());
        assert_relative_eq!(report.total_area_deg2(), 64800.0, max_relative = 1e-6);
        // Korrigierte Fläche ist nie größer als das Rechteck mit vollem Faktor
        assert!(report.totals.total() <= 64800.0 * 69.0 * 69.0);
    }

    #[test]
    fn corner_cluster_still_partitions_the_world() {
        let points: Vec<OwnedPoint> = square_points()
            .into_iter()
            .map(|p| OwnedPoint::new(p.owner.clone(), p.longitude() + 170.0, p.latitude() + 80.0))
            .collect();

        for config in [
            GeometryConfig::default(),
            GeometryConfig::default().with_auto_radius(),
        ] {
            let report = compute_territories(&config, &points).unwrap();
            assert!(report.skipped.is_empty());
            assert_relative_eq!(report.total_area_deg2(), 64800.0, max_relative = 1e-9);
            assert_relative_eq!(
                report.cells[0].measurement.area_deg2,
                350.5 * 170.5,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn sink_failure_fails_the_cycle_without_hook() {
        struct BrokenSink;
        impl AreaSink for BrokenSink {
            fn replace_all(&mut self, _totals: &TerritoryTotals) -> Result<(), SinkError> {
                Err(SinkError::Unavailable {
                    message: "disk full".into(),
                })
            }
        }

        let hook_calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hook_calls);
        let mut pipeline = TerritoryPipeline::new(
            PipelineConfig::default(),
            MemorySource::new(square_points()),
            BrokenSink,
        )
        .unwrap()
        .on_published(move |_| counter.set(counter.get() + 1));

        assert!(matches!(
            pipeline.run_cycle(),
            CycleOutcome::Failed(TerritoryError::Sink(SinkError::Unavailable { .. }))
        ));
        assert_eq!(hook_calls.get(), 0);

        let summary = pipeline.run(Schedule::Once);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.published, 0);
    }

    #[test]
    fn clipping_never_grows_a_region() {
        let config = GeometryConfig::default();
        let points = random_points(3, 25);
        let positions: Vec<Point2D> = points.iter().map(|p| p.position).collect();
        let diagram = PlanarVoronoiBuilder::new().build(&positions).unwrap();
        let finite = FiniteRegionReconstructor::new(config.radius_for(&positions))
            .unwrap()
            .reconstruct(&diagram);
        let clipper = BoundedClipper::new(config.bounds);

        for index in 0..points.len() {
            let polygon = finite.polygon(index).unwrap();
            let clipped = clipper.clip(&polygon);
            assert!(area(clipped.vertices()) <= area(&polygon) + 1e-9);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let points = random_points(11, 30);
        let config = GeometryConfig::default();
        let first = compute_territories(&config, &points).unwrap();
        let second = compute_territories(&config, &points).unwrap();
        assert_eq!(first.totals, second.totals);
    }

    #[test]
    fn duplicate_pair_is_skipped_but_others_publish() {
        let mut points = square_points();
        points.push(OwnedPoint::new("twin_a", 0.3, 0.6));
        points.push(OwnedPoint::new("twin_b", 0.3, 0.6));
        points.push(OwnedPoint::new("center", 0.6, 0.4));

        let mut pipeline = memory_pipeline(points);
        let CycleOutcome::Published(report) = pipeline.run_cycle() else {
            panic!("cycle should publish");
        };

        let reasons: Vec<(usize, RegionError)> =
            report.skipped.iter().map(|s| (s.index, s.reason)).collect();
        assert_eq!(
            reasons,
            vec![(4, RegionError::DuplicateSite), (5, RegionError::DuplicateSite)]
        );
        let published = pipeline.sink().totals().unwrap();
        assert!(published.get("twin_a").is_none());
        assert!(published.get("twin_b").is_none());
        for owner in ["sw", "se", "nw", "ne", "center"] {
            assert!(published.get(owner).is_some_and(|a| a > 0.0), "{owner}");
        }
    }

    #[test]
    fn owner_totals_merge_all_their_cells() {
        let points = vec![
            OwnedPoint::new("alice", -100.0, 40.0),
            OwnedPoint::new("alice", 100.0, -40.0),
            OwnedPoint::new("bob", 0.0, 0.0),
            OwnedPoint::new("carol", -100.0, -40.0),
            OwnedPoint::new("dave", 100.0, 40.0),
        ];
        let report = compute_territories(&GeometryConfig::default(), &points).unwrap();

        let alice_cells: Vec<f64> = report
            .cells
            .iter()
            .filter(|c| c.owner == "alice")
            .map(|c| c.measurement.area_sq_miles)
            .collect();
        assert_eq!(alice_cells.len(), 2);
        let alice = report.totals.get("alice").unwrap();
        assert_relative_eq!(alice, alice_cells[0] + alice_cells[1], max_relative = 1e-12);
        assert!(alice > alice_cells[0] && alice > alice_cells[1]);
    }

    #[test]
    fn too_few_points_fail_without_touching_the_sink() {
        let mut pipeline = memory_pipeline(square_points());
        assert!(matches!(pipeline.run_cycle(), CycleOutcome::Published(_)));
        let before = pipeline.sink().totals().cloned();

        pipeline.source_mut().set_points(square_points()[..3].to_vec());
        let outcome = pipeline.run_cycle();
        assert!(matches!(
            outcome,
            CycleOutcome::Failed(TerritoryError::Input(MathError::InsufficientPoints { .. }))
        ));
        assert_eq!(pipeline.sink().publish_count(), 1);
        assert_eq!(pipeline.sink().totals().cloned(), before);
    }

    #[test]
    fn source_failure_aborts_the_cycle() {
        let source = || -> Result<Vec<OwnedPoint>, SourceError> {
            Err(SourceError::Unavailable {
                message: "database down".into(),
            })
        };
        let mut pipeline =
            TerritoryPipeline::new(PipelineConfig::default(), source, MemorySink::new()).unwrap();
        assert!(matches!(
            pipeline.run_cycle(),
            CycleOutcome::Failed(TerritoryError::Source(_))
        ));
        assert_eq!(pipeline.sink().publish_count(), 0);
    }

    #[test]
    fn empty_source_is_no_data() {
        let mut pipeline = memory_pipeline(Vec::new());
        assert!(matches!(pipeline.run_cycle(), CycleOutcome::NoData));
        assert!(pipeline.sink().totals().is_none());
    }

    #[test]
    fn interval_schedule_runs_fresh_cycles() {
        let published = Rc::new(Cell::new(0));
        let counter = Rc::clone(&published);
        let mut pipeline = memory_pipeline(square_points()).on_published(move |report| {
            assert_eq!(report.totals.len(), 4);
            counter.set(counter.get() + 1);
        });

        let summary = pipeline.run(Schedule::Interval {
            period: Duration::ZERO,
            max_cycles: Some(3),
        });
        assert_eq!(
            summary,
            RunSummary {
                cycles: 3,
                published: 3,
                no_data: 0,
                failed: 0
            }
        );
        assert_eq!(published.get(), 3);
        assert_eq!(pipeline.sink().publish_count(), 3);
    }

    #[test]
    fn run_once_runs_a_single_cycle() {
        let mut pipeline = memory_pipeline(square_points());
        let summary = pipeline.run(Schedule::Once);
        assert_eq!(summary.cycles, 1);
        assert_eq!(summary.published, 1);
    }

    #[test]
    fn custom_bounds_are_respected() {
        let bounds = Bounds2D::from_points(coord! { x: -2.0, y: -2.0 }, coord! { x: 3.0, y: 3.0 });
        let config = GeometryConfig::default().with_bounds(bounds).with_radius(100.0);
        let report = compute_territories(&config, &square_points()).unwrap();
        assert_relative_eq!(report.total_area_deg2(), 25.0, max_relative = 1e-9);
        for cell in &report.cells {
            assert!(cell.polygon.vertices().iter().all(|v| bounds.contains_point(*v)));
        }
    }
}
