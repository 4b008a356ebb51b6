//! Headline counts shown above the map.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::filter::FilteredView;
use crate::status::Status;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub records: usize,
    pub by_status: BTreeMap<Status, usize>,
}

impl Kpis {
    pub fn of(view: &FilteredView<'_>) -> Self {
        let mut by_status: BTreeMap<Status, usize> =
            Status::ALL.iter().map(|s| (*s, 0)).collect();
        for record in view.records() {
            *by_status.entry(record.status).or_default() += 1;
        }
        Self {
            records: view.len(),
            by_status,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterSpec, filter};
    use crate::record::Dataset;

    #[test]
    fn counts_per_status() {
        let header = vec![
            "Job Status".to_string(),
            "Latitude".to_string(),
            "Longitude".to_string(),
        ];
        let rows = ["Open", "open", "In Progress", "Closed", "whatever"]
            .iter()
            .map(|s| vec![s.to_string(), "1".into(), "2".into()])
            .collect::<Vec<_>>();
        let ds = Dataset::from_rows(header, rows).unwrap();
        let kpis = Kpis::of(&filter(&ds, &FilterSpec::default()));
        assert_eq!(kpis.records, 5);
        assert_eq!(kpis.count(Status::Open), 2);
        assert_eq!(kpis.count(Status::Attended), 1);
        assert_eq!(kpis.count(Status::Completed), 0);
        assert_eq!(kpis.count(Status::Closed), 1);
        assert_eq!(kpis.count(Status::Unknown), 1);
        assert_eq!(kpis.by_status.values().sum::<usize>(), kpis.records);
    }
}
