//! Observer traits for streaming results while a run is in progress

use crate::results::SyncResult;

type ResultFn = dyn Fn(&SyncResult) + Send + Sync;

/// Receives every result at the moment it is appended to the log
///
/// Calls are synchronous and happen in log order, so an observer always sees exactly
/// the sequence that ends up in the returned [`SyncResults`](crate::results::SyncResults).
pub trait ResultObserver: Send + Sync {
	fn on_result(&self, result: &SyncResult);
}

/// Observer that ignores everything
pub struct NoObserver;

impl ResultObserver for NoObserver {
	fn on_result(&self, _result: &SyncResult) {}
}

/// Observer backed by a closure
pub struct FnObserver {
	callback: Box<ResultFn>,
}

impl ResultObserver for FnObserver {
	fn on_result(&self, result: &SyncResult) {
		(self.callback)(result);
	}
}

/// Wrap a closure as a [`ResultObserver`]
pub fn observer_fn<F>(callback: F) -> FnObserver
where
	F: Fn(&SyncResult) + Send + Sync + 'static,
{
	FnObserver { callback: Box::new(callback) }
}

/// Forwards each result to several observers, in the order they were added
#[derive(Default)]
pub struct ObserverSet {
	observers: Vec<Box<dyn ResultObserver>>,
}

impl ObserverSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, observer: impl ResultObserver + 'static) -> Self {
		self.observers.push(Box::new(observer));
		self
	}

	pub fn push(&mut self, observer: Box<dyn ResultObserver>) {
		self.observers.push(observer);
	}

	pub fn is_empty(&self) -> bool {
		self.observers.is_empty()
	}
}

impl ResultObserver for ObserverSet {
	fn on_result(&self, result: &SyncResult) {
		for observer in &self.observers {
			observer.on_result(result);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	#[test]
	fn test_fn_observer_receives_results() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let observer = observer_fn(move |r| sink.lock().unwrap().push(r.message().to_string()));

		observer.on_result(&SyncResult::trace("one"));
		observer.on_result(&SyncResult::trace("two"));

		assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
	}

	#[test]
	fn test_observer_set_fans_out_in_order() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let first = seen.clone();
		let second = seen.clone();
		let set = ObserverSet::new()
			.with(observer_fn(move |r| first.lock().unwrap().push(format!("a:{}", r.message()))))
			.with(observer_fn(move |r| second.lock().unwrap().push(format!("b:{}", r.message()))));

		set.on_result(&SyncResult::trace("x"));

		assert_eq!(*seen.lock().unwrap(), vec!["a:x", "b:x"]);
	}
}

// vim: ts=4
