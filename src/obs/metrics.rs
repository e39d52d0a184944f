// self
use crate::obs::{CallKind, CallOutcome};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"aip_client_call_total",
			"call" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[cfg(not(feature = "metrics"))]
	#[test]
	fn record_call_outcome_noop_without_metrics() {
		record_call_outcome(CallKind::FaceMatch, CallOutcome::Failure);
	}

	#[cfg(feature = "metrics")]
	#[test]
	fn record_call_outcome_labels_call_and_outcome() {
		// std
		use std::sync::{Arc, atomic::AtomicU64, atomic::Ordering};
		// crates.io
		use metrics::{
			Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
		};
		use parking_lot::Mutex;

		#[derive(Default)]
		struct CapturingRecorder {
			keys: Mutex<Vec<Key>>,
			total: Arc<AtomicU64>,
		}
		impl Recorder for CapturingRecorder {
			fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

			fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
				self.keys.lock().push(key.clone());

				Counter::from_arc(self.total.clone())
			}

			fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
				Gauge::noop()
			}

			fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
				Histogram::noop()
			}
		}

		let recorder = CapturingRecorder::default();

		metrics::with_local_recorder(&recorder, || {
			record_call_outcome(CallKind::FaceMatch, CallOutcome::Failure);
		});

		let keys = recorder.keys.lock();
		let labels = keys[0].labels().map(|l| (l.key(), l.value())).collect::<Vec<_>>();

		assert_eq!(keys.len(), 1);
		assert_eq!(keys[0].name(), "aip_client_call_total");
		assert_eq!(labels, vec![("call", "face_match"), ("outcome", "failure")]);
		assert_eq!(recorder.total.load(Ordering::Relaxed), 1);
	}
}
