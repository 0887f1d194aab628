//! Time-axis construction and dataset assembly.
//!
//! Individually well-formed responses still have to agree with each other:
//! the descriptor's total sample count must split evenly across the trigger
//! count, and every channel must report the same segment count and the same
//! per-segment sample count as the shared time axis. All of that is checked
//! here, before a [`TraceDataset`] is constructed. The dataset is built once
//! and never mutated; partial datasets are never produced.

use crate::error::{AppResult, ScopeError};
use crate::parse::Descriptor;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One trigger-to-trigger acquisition window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Absolute sample times, seconds, relative to the first trigger.
    pub time: Vec<f64>,
    /// Sample values per requested channel, keyed by identifier (`"C1"`..).
    /// Every array has the same length as `time`.
    pub channels: BTreeMap<String, Vec<f64>>,
}

/// The final acquisition product handed whole to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDataset {
    /// Instrument identity string, as returned by `*IDN?`.
    pub identity: String,
    /// Segment records in trigger order.
    pub segments: Vec<SegmentRecord>,
}

/// Builds one time axis per segment from the descriptor and trigger times.
///
/// `samples_per_segment` is `wave_array_count / len(trigger_times)` and the
/// division must be exact; a remainder means the responses describe
/// different acquisitions and fails with
/// [`ScopeError::IndivisibleSampleCount`]. Axis `i` is
/// `trigger_times[i] + k * horiz_interval` for `k` in
/// `0..samples_per_segment`.
pub fn build_time_axes(descriptor: &Descriptor, trigger_times: &[f64]) -> AppResult<Vec<Vec<f64>>> {
    let segment_count = trigger_times.len();
    if segment_count == 0 {
        return Err(ScopeError::NoTriggerData);
    }
    if descriptor.wave_array_count % segment_count as u64 != 0 {
        return Err(ScopeError::IndivisibleSampleCount {
            wave_array_count: descriptor.wave_array_count,
            segment_count,
        });
    }
    let samples_per_segment = (descriptor.wave_array_count / segment_count as u64) as usize;

    let prototype: Vec<f64> = (0..samples_per_segment)
        .map(|k| k as f64 * descriptor.horiz_interval)
        .collect();

    Ok(trigger_times
        .iter()
        .map(|&trigger| prototype.iter().map(|&t| t + trigger).collect())
        .collect())
}

/// Merges per-channel sample arrays with the shared time axes.
///
/// `channels` holds `(identifier, segments)` pairs in the caller's requested
/// order; ordering of the map inside each record is by identifier. Every
/// channel must match the axis count ([`ScopeError::SegmentCountMismatch`])
/// and every segment the axis length ([`ScopeError::SampleLengthMismatch`]).
pub fn assemble(
    identity: String,
    time_axes: Vec<Vec<f64>>,
    channels: Vec<(String, Vec<Vec<f64>>)>,
) -> AppResult<TraceDataset> {
    for (id, segments) in &channels {
        if segments.len() != time_axes.len() {
            return Err(ScopeError::SegmentCountMismatch {
                channel: id.clone(),
                expected: time_axes.len(),
                actual: segments.len(),
            });
        }
        for (segment, (samples, axis)) in segments.iter().zip(time_axes.iter()).enumerate() {
            if samples.len() != axis.len() {
                return Err(ScopeError::SampleLengthMismatch {
                    channel: id.clone(),
                    segment,
                    expected: axis.len(),
                    actual: samples.len(),
                });
            }
        }
    }

    let mut per_channel: Vec<(String, std::vec::IntoIter<Vec<f64>>)> = channels
        .into_iter()
        .map(|(id, segments)| (id, segments.into_iter()))
        .collect();

    let segments = time_axes
        .into_iter()
        .map(|time| {
            let channels = per_channel
                .iter_mut()
                .map(|(id, segments)| {
                    // Lengths were validated above; the iterators stay in step.
                    let samples = segments.next().unwrap_or_default();
                    (id.clone(), samples)
                })
                .collect();
            SegmentRecord { time, channels }
        })
        .collect::<Vec<_>>();

    info!(
        "Assembled dataset: {} segments, {} channels",
        segments.len(),
        per_channel.len()
    );
    Ok(TraceDataset { identity, segments })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(interval: f64, count: u64) -> Descriptor {
        Descriptor {
            horiz_interval: interval,
            wave_array_count: count,
        }
    }

    fn close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{a} != {e}");
        }
    }

    #[test]
    fn axes_are_prototype_plus_trigger() {
        let axes = build_time_axes(&descriptor(1.0e-01, 20), &[0.0, 0.25]).unwrap();
        assert_eq!(axes.len(), 2);
        close(&axes[0], &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]);
        close(
            &axes[1],
            &[0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95, 1.05, 1.15],
        );
    }

    #[test]
    fn remainder_in_sample_split_fails() {
        match build_time_axes(&descriptor(1.0e-09, 20), &[0.0, 0.1, 0.2]) {
            Err(ScopeError::IndivisibleSampleCount {
                wave_array_count,
                segment_count,
            }) => {
                assert_eq!(wave_array_count, 20);
                assert_eq!(segment_count, 3);
            }
            other => panic!("expected IndivisibleSampleCount, got {other:?}"),
        }
    }

    #[test]
    fn single_segment_axis_starts_at_trigger() {
        let axes = build_time_axes(&descriptor(2.0e+00, 3), &[0.5]).unwrap();
        close(&axes[0], &[0.5, 2.5, 4.5]);
    }

    #[test]
    fn assemble_zips_axes_and_channels() {
        let axes = vec![vec![0.0, 0.1], vec![0.25, 0.35]];
        let channels = vec![
            ("C1".to_string(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
            ("C2".to_string(), vec![vec![5.0, 6.0], vec![7.0, 8.0]]),
        ];
        let dataset = assemble("LECROY,LC574AL".to_string(), axes, channels).unwrap();

        assert_eq!(dataset.identity, "LECROY,LC574AL");
        assert_eq!(dataset.segments.len(), 2);
        assert_eq!(dataset.segments[0].time, vec![0.0, 0.1]);
        assert_eq!(dataset.segments[0].channels["C1"], vec![1.0, 2.0]);
        assert_eq!(dataset.segments[0].channels["C2"], vec![5.0, 6.0]);
        assert_eq!(dataset.segments[1].channels["C1"], vec![3.0, 4.0]);
        assert_eq!(dataset.segments[1].channels["C2"], vec![7.0, 8.0]);
    }

    #[test]
    fn segment_count_mismatch_is_rejected_not_truncated() {
        let axes = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let channels = vec![
            (
                "C1".to_string(),
                vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]],
            ),
            ("C2".to_string(), vec![vec![1.0], vec![2.0], vec![3.0]]),
        ];
        match assemble("id".to_string(), axes, channels) {
            Err(ScopeError::SegmentCountMismatch {
                channel,
                expected,
                actual,
            }) => {
                assert_eq!(channel, "C2");
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected SegmentCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn sample_length_mismatch_names_the_segment() {
        let axes = vec![vec![0.0, 0.1], vec![1.0, 1.1]];
        let channels = vec![(
            "C3".to_string(),
            vec![vec![1.0, 2.0], vec![3.0]],
        )];
        match assemble("id".to_string(), axes, channels) {
            Err(ScopeError::SampleLengthMismatch {
                channel,
                segment,
                expected,
                actual,
            }) => {
                assert_eq!(channel, "C3");
                assert_eq!(segment, 1);
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected SampleLengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn dataset_round_trips_through_json() {
        let axes = vec![vec![0.0, 0.5]];
        let channels = vec![("C1".to_string(), vec![vec![-1.0, 1.0]])];
        let dataset = assemble("id".to_string(), axes, channels).unwrap();
        let text = serde_json::to_string(&dataset).unwrap();
        let back: TraceDataset = serde_json::from_str(&text).unwrap();
        assert_eq!(back, dataset);
    }
}
