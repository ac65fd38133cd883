use crate::pool::WorkerPool;
use crate::services::{HistoricalLocatorService, YearLocators};
use crate::types::station::Bounds;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Determines the span of archived years per station.
#[derive(Clone)]
pub struct StationBoundsResolver {
    locator: Arc<dyn HistoricalLocatorService>,
    pool: WorkerPool,
}

impl StationBoundsResolver {
    pub fn new(locator: Arc<dyn HistoricalLocatorService>, pool: WorkerPool) -> Self {
        Self { locator, pool }
    }

    /// Never fails: a lookup failure or a station without archives is [`Bounds::Unknown`].
    pub async fn resolve_bounds(&self, station_id: &str) -> Bounds {
        match self.locator.available_years(station_id).await {
            Ok(locators) => {
                let bounds = bounds_from_locators(&locators);
                debug!("Station {} bounds: {:?}", station_id, bounds);
                bounds
            }
            Err(e) => {
                warn!("Could not resolve bounds of station {}: {}", station_id, e);
                Bounds::Unknown
            }
        }
    }

    /// Resolves each distinct id once; the map has exactly one entry per id.
    pub async fn resolve_bounds_many<I, S>(&self, station_ids: I) -> BTreeMap<String, Bounds>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: BTreeSet<String> = station_ids.into_iter().map(Into::into).collect();
        self.pool
            .run(ids, |id| async move {
                let bounds = self.resolve_bounds(&id).await;
                (id, bounds)
            })
            .await
            .into_iter()
            .collect()
    }
}

/// Min and max over the keys that are integer years. Other keys are ignored.
fn bounds_from_locators(locators: &YearLocators) -> Bounds {
    let years = locators
        .keys()
        .filter_map(|key| key.trim().parse::<i32>().ok());
    years
        .fold(None, |acc: Option<(i32, i32)>, year| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(year), hi.max(year)),
                None => (year, year),
            })
        })
        .map_or(Bounds::Unknown, |(min_year, max_year)| Bounds::Known {
            min_year,
            max_year,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryLocator;

    #[test]
    fn test_bounds_compare_years_as_integers() {
        let locators = YearLocators::from([
            ("999".to_string(), "a".to_string()),
            ("2001".to_string(), "b".to_string()),
            ("1985".to_string(), "c".to_string()),
            ("b2001".to_string(), "d".to_string()),
        ]);
        // Lexically "999" would be the maximum.
        assert_eq!(
            bounds_from_locators(&locators),
            Bounds::Known {
                min_year: 999,
                max_year: 2001
            }
        );
        assert_eq!(bounds_from_locators(&YearLocators::new()), Bounds::Unknown);
    }

    #[tokio::test]
    async fn test_resolve_bounds_many() {
        let locator = MemoryLocator::default()
            .with_year("a", 2010, "a/2010")
            .with_year("a", 2015, "a/2015")
            .with_year("b", 2020, "b/2020")
            .failing("down");
        let resolver = StationBoundsResolver::new(Arc::new(locator), WorkerPool::parallel(3));

        let bounds = resolver
            .resolve_bounds_many(["a", "b", "down", "empty", "a"])
            .await;
        assert_eq!(bounds.len(), 4);
        assert_eq!(
            bounds["a"],
            Bounds::Known {
                min_year: 2010,
                max_year: 2015
            }
        );
        assert_eq!(bounds["b"].years(), Some((2020, 2020)));
        assert_eq!(bounds["down"], Bounds::Unknown);
        assert_eq!(bounds["empty"], Bounds::Unknown);
    }
}
