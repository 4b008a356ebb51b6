//! Status / zone / search filtering over a [`Dataset`].
//!
//! Facet filters (status set, zone set) AND together; an empty facet means
//! "no restriction". A non-blank search string switches to search mode,
//! where only the job-order substring match applies and the facets are
//! ignored. That mirrors how the dashboard has always behaved; whether
//! search should compose with the facets instead is an open product
//! question.

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::record::{Dataset, Record};
use crate::schema::{columns, dataset_schema};
use crate::status::Status;

/// User-selected filters for one render cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub statuses: BTreeSet<Status>,
    pub zones: BTreeSet<String>,
    pub search: Option<String>,
}

/// Which predicates a [`FilterSpec`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Facets,
    Search,
}

impl FilterSpec {
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.statuses.extend(statuses);
        self
    }

    /// Zones are trimmed to match [`Record::zone`]; blank entries are ignored.
    pub fn with_zones<S: Into<String>>(mut self, zones: impl IntoIterator<Item = S>) -> Self {
        self.zones.extend(
            zones
                .into_iter()
                .map(|z| Into::<String>::into(z).trim().to_string())
                .filter(|z| !z.is_empty()),
        );
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// The trimmed search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn mode(&self) -> FilterMode {
        if self.search_term().is_some() {
            FilterMode::Search
        } else {
            FilterMode::Facets
        }
    }

    /// The zone, when exactly one is selected.
    pub fn single_zone(&self) -> Option<&str> {
        match self.zones.len() {
            1 => self.zones.iter().next().map(|s| s.as_str()),
            _ => None,
        }
    }

    /// The status, when exactly one is selected.
    pub fn single_status(&self) -> Option<Status> {
        match self.statuses.len() {
            1 => self.statuses.iter().next().copied(),
            _ => None,
        }
    }

    /// Whether `record` passes. Facets on columns the dataset lacks are skipped.
    pub fn matches(&self, dataset: &Dataset, record: &Record) -> bool {
        if let Some(term) = self.search_term() {
            if !dataset.has_column(columns::JOB_ORDER) {
                return true;
            }
            let needle = term.to_lowercase();
            return record
                .get(columns::JOB_ORDER)
                .is_some_and(|id| id.to_lowercase().contains(&needle));
        }

        if !self.statuses.is_empty()
            && dataset.has_column(columns::JOB_STATUS)
            && !self.statuses.contains(&record.status)
        {
            return false;
        }

        if !self.zones.is_empty()
            && dataset.has_column(columns::FLOOR)
            && !record.zone().is_some_and(|z| self.zones.contains(z))
        {
            return false;
        }

        true
    }
}

/// Read-only subset of a [`Dataset`], held as row indices.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

/// Apply `spec` to `dataset`. The dataset is left untouched.
pub fn filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    FilteredView::all(dataset).filter(spec)
}

impl<'a> FilteredView<'a> {
    /// A view over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            rows: (0..dataset.len()).collect(),
        }
    }

    /// Narrow this view further.
    pub fn filter(&self, spec: &FilterSpec) -> FilteredView<'a> {
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| spec.matches(self.dataset, &self.dataset.records()[i]))
            .collect();
        FilteredView {
            dataset: self.dataset,
            rows,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.dataset.records();
        self.rows.iter().map(move |&i| &records[i])
    }

    /// Job order numbers of the rows that have one.
    pub fn identifiers(&self) -> Vec<&'a str> {
        self.records().filter_map(|r| r.identifier()).collect()
    }

    /// Materialise the view as an Arrow batch in dataset column order.
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let names = self.dataset.columns();
        let schema = Arc::new(dataset_schema(names));

        let arrays: Vec<ArrayRef> = names
            .iter()
            .map(|name| -> ArrayRef {
                match name.as_str() {
                    columns::LATITUDE => {
                        Arc::new(Float64Array::from_iter_values(self.records().map(|r| r.latitude)))
                    }
                    columns::LONGITUDE => {
                        Arc::new(Float64Array::from_iter_values(self.records().map(|r| r.longitude)))
                    }
                    _ => Arc::new(StringArray::from_iter(self.records().map(|r| r.get(name)))),
                }
            })
            .collect();

        RecordBatch::try_new(schema, arrays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let header = ["Job Order No.", "Job Status", "Floor Description", "Latitude", "Longitude"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = [
            ["JO-100", "Open", "Ground Floor", "24.70", "46.60"],
            ["JO-101", "In Progress", "Ground Floor", "24.71", "46.61"],
            ["JO-102", "Completed", "North Wing", "24.72", "46.62"],
            ["JO-203", "Closed", "North Wing", "24.73", "46.63"],
            ["jo-204", "Open", "", "24.74", "46.64"],
        ];
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect::<Vec<_>>();
        Dataset::from_rows(header, rows).unwrap()
    }

    #[test]
    fn empty_spec_is_identity() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::default());
        assert_eq!(view.len(), ds.len());
        let all: Vec<_> = view.records().cloned().collect();
        assert_eq!(all, ds.records());
    }

    #[test]
    fn status_facet() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::default().with_statuses([Status::Open]));
        assert_eq!(view.identifiers(), vec!["JO-100", "jo-204"]);
    }

    #[test]
    fn zone_facet() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::default().with_zones(["North Wing"]));
        assert_eq!(view.identifiers(), vec!["JO-102", "JO-203"]);
    }

    #[test]
    fn zone_selection_is_trimmed() {
        let ds = dataset();
        let spec = FilterSpec::default().with_zones([" North Wing ", "   "]);
        assert_eq!(spec.zones.len(), 1);
        assert_eq!(filter(&ds, &spec).identifiers(), vec!["JO-102", "JO-203"]);
    }

    #[test]
    fn facets_and_together() {
        let ds = dataset();
        let spec = FilterSpec::default()
            .with_statuses([Status::Open, Status::Completed])
            .with_zones(["North Wing", "Ground Floor"]);
        let view = filter(&ds, &spec);
        assert_eq!(view.identifiers(), vec!["JO-100", "JO-102"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::default().with_search("JO-20"));
        assert_eq!(view.identifiers(), vec!["JO-203", "jo-204"]);
    }

    #[test]
    fn search_supersedes_facets() {
        let ds = dataset();
        let spec = FilterSpec::default()
            .with_statuses([Status::Closed])
            .with_zones(["Ground Floor"])
            .with_search("jo-10");
        assert_eq!(spec.mode(), FilterMode::Search);
        let view = filter(&ds, &spec);
        assert_eq!(view.identifiers(), vec!["JO-100", "JO-101", "JO-102"]);
    }

    #[test]
    fn blank_search_falls_back_to_facets() {
        let ds = dataset();
        let spec = FilterSpec::default()
            .with_statuses([Status::Closed])
            .with_search("   ");
        assert_eq!(spec.mode(), FilterMode::Facets);
        assert_eq!(filter(&ds, &spec).identifiers(), vec!["JO-203"]);
    }

    #[test]
    fn idempotent() {
        let ds = dataset();
        let specs = [
            FilterSpec::default(),
            FilterSpec::default().with_statuses([Status::Open]),
            FilterSpec::default().with_zones(["North Wing"]),
            FilterSpec::default().with_search("10"),
        ];
        for spec in &specs {
            let once = filter(&ds, spec);
            let twice = once.filter(spec);
            assert_eq!(once, twice, "{spec:?}");
        }
    }

    #[test]
    fn facet_on_missing_column_is_skipped() {
        let header = vec!["Latitude".to_string(), "Longitude".to_string()];
        let ds = Dataset::from_rows(header, vec![vec!["1".into(), "2".into()]]).unwrap();
        let spec = FilterSpec::default()
            .with_statuses([Status::Open])
            .with_zones(["North Wing"]);
        assert_eq!(filter(&ds, &spec).len(), 1);
        assert_eq!(filter(&ds, &FilterSpec::default().with_search("x")).len(), 1);
    }

    #[test]
    fn single_selection_helpers() {
        let spec = FilterSpec::default()
            .with_zones(["North Wing"])
            .with_statuses([Status::Open, Status::Closed]);
        assert_eq!(spec.single_zone(), Some("North Wing"));
        assert_eq!(spec.single_status(), None);
    }

    #[test]
    fn record_batch_preserves_columns_and_rows() {
        let ds = dataset();
        let view = filter(&ds, &FilterSpec::default().with_zones(["North Wing"]));
        let batch = view.to_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 5);
        let lat = batch
            .column_by_name("Latitude")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(lat.value(0), 24.72);
        let ids = batch
            .column_by_name("Job Order No.")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(ids.value(1), "JO-203");
    }
}
