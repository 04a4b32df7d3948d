//! Cube aggregation over comparison records

use crate::align::{Alignment, ComparisonRecord};
use crate::cube::{Coord, Cube, SentenceIndex};
use crate::monoid::Monoid;
use crate::rates::{derive_rates, RateCube};

/// Attachment distances collected during aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distances {
    /// Dependent to predicted head, every record
    pub total: Vec<usize>,
    /// Dependent to gold head, every record
    pub gold: Vec<usize>,
    /// Dependent to predicted head, wrong attachments only
    pub error: Vec<usize>,
    /// Dependent to predicted head, correct attachments only
    pub correct: Vec<usize>,
}

impl Distances {
    /// Arithmetic means; an empty list yields NaN
    pub fn means(&self) -> DistanceMeans {
        DistanceMeans {
            total: mean(&self.total),
            gold: mean(&self.gold),
            error: mean(&self.error),
            correct: mean(&self.correct),
        }
    }

    fn extend(&mut self, other: Distances) {
        self.total.extend(other.total);
        self.gold.extend(other.gold);
        self.error.extend(other.error);
        self.correct.extend(other.correct);
    }
}

/// Mean attachment distances; NaN marks a list with no data
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMeans {
    /// Mean over all predicted attachments
    pub total: f64,
    /// Mean over all gold attachments
    pub gold: f64,
    /// Mean over wrong predicted attachments
    pub error: f64,
    /// Mean over correct predicted attachments
    pub correct: f64,
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Everything built in one pass over the comparison records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubeStats {
    /// Record counts per coordinate
    pub total: Cube,
    /// Wrong-attachment counts per coordinate
    pub errors: Cube,
    /// Sentences contributing errors per coordinate
    pub sentence_ids: SentenceIndex,
    /// Attachment distances
    pub distances: Distances,
}

impl CubeStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the cubes and distance lists
    pub fn record(&mut self, record: &ComparisonRecord<'_>) {
        let coords = Coord::fanout(
            record.token.deprel(),
            record.gold_head.deprel(),
            record.head.deprel(),
        );
        let distance = record.distance();

        self.distances.total.push(distance);
        self.distances.gold.push(record.gold_distance());

        if record.is_correct() {
            for coord in coords {
                self.total.increment(coord);
            }
            self.distances.correct.push(distance);
        } else {
            for coord in coords {
                self.total.increment(coord.clone());
                self.errors.increment(coord.clone());
                self.sentence_ids.push(coord, record.sentence_id);
            }
            self.distances.error.push(distance);
        }
    }

    /// Error rate per populated error cell
    pub fn rates(&self) -> RateCube {
        derive_rates(&self.total, &self.errors)
    }

    /// Number of scored records
    pub fn record_count(&self) -> usize {
        self.total.get(&Coord::all())
    }

    /// Number of wrong attachments
    pub fn error_count(&self) -> usize {
        self.errors.get(&Coord::all())
    }

    /// Headline numbers for a finished run
    pub fn summary(&self, alignment: &Alignment<'_>) -> Summary {
        let records = self.record_count();
        let errors = self.error_count();
        let accuracy = if records == 0 {
            f64::NAN
        } else {
            1.0 - errors as f64 / records as f64
        };

        Summary {
            sentences: alignment.retained(),
            dropped: alignment.dropped,
            records,
            errors,
            accuracy,
            distances: self.distances.means(),
        }
    }
}

impl Monoid for CubeStats {
    fn identity() -> Self {
        Self::default()
    }

    fn combine(mut self, other: Self) -> Self {
        self.total.merge(other.total);
        self.errors.merge(other.errors);
        self.sentence_ids.merge(other.sentence_ids);
        self.distances.extend(other.distances);
        self
    }
}

/// Headline numbers of an evaluation run
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// Retained sentences
    pub sentences: usize,
    /// Sentences dropped for tokenization mismatch
    pub dropped: usize,
    /// Scored tokens
    pub records: usize,
    /// Wrongly attached tokens
    pub errors: usize,
    /// Share of correctly attached tokens; NaN without records
    pub accuracy: f64,
    /// Mean attachment distances
    pub distances: DistanceMeans,
}

/// Aggregate records in a single sequential pass
pub fn aggregate(records: &[ComparisonRecord<'_>]) -> CubeStats {
    let mut stats = CubeStats::new();
    for record in records {
        stats.record(record);
    }
    stats
}

/// Aggregate contiguous shards on the rayon pool and combine them in order.
///
/// The result is identical to [`aggregate`], including the order of sentence
/// ids in the index.
#[cfg(feature = "parallel")]
pub fn aggregate_parallel(records: &[ComparisonRecord<'_>], shards: usize) -> CubeStats {
    use crate::monoid::MonoidReduce;
    use rayon::prelude::*;

    let shards = shards.max(1);
    if shards == 1 || records.len() < shards {
        return aggregate(records);
    }

    let shard_len = records.len().div_ceil(shards);
    let states: Vec<CubeStats> = records.par_chunks(shard_len).map(aggregate).collect();
    tracing::debug!("combining {} shard states", states.len());

    CubeStats::reduce(states)
}
