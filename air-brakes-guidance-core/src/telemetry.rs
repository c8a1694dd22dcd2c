//! Flight-state hand-off between the sensor side and the control loop.
//!
//! A fixed-capacity single-producer single-consumer ring: the interrupt-side
//! writer enqueues fused snapshots, the control loop reads the most recent
//! one. Snapshots are plain `Copy` values, so the reader can never observe a
//! torn state.

use heapless::spsc::{Consumer, Producer, Queue};
use serde::{Deserialize, Serialize};

/// One fused sensor snapshot, consumed by value each control cycle.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    /// Altitude above the launch site, m.
    pub altitude: f64,
    /// Vertical velocity, m/s, up positive.
    pub velocity: f64,
    /// Seconds since launch.
    pub timestamp: f64,
}

/// Owned ring buffer; split once into its writer and reader halves.
/// Capacity is `N - 1` and `N` must be at least 2.
pub struct FlightStateBuffer<const N: usize> {
    queue: Queue<FlightState, N>,
}

impl<const N: usize> FlightStateBuffer<N> {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
        }
    }

    pub fn split(&mut self) -> (FlightStateWriter<'_, N>, FlightStateReader<'_, N>) {
        let (producer, consumer) = self.queue.split();
        (
            FlightStateWriter { producer },
            FlightStateReader {
                consumer,
                latest: None,
            },
        )
    }
}

impl<const N: usize> Default for FlightStateBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side half; lock-free push.
pub struct FlightStateWriter<'a, const N: usize> {
    producer: Producer<'a, FlightState, N>,
}

impl<const N: usize> FlightStateWriter<'_, N> {
    /// Enqueues a snapshot. Returns false (and drops the sample) when the
    /// reader has fallen behind and the ring is full.
    pub fn push(&mut self, state: FlightState) -> bool {
        self.producer.enqueue(state).is_ok()
    }
}

/// Control-loop half; exposes only whole-value snapshots.
pub struct FlightStateReader<'a, const N: usize> {
    consumer: Consumer<'a, FlightState, N>,
    latest: Option<FlightState>,
}

impl<const N: usize> FlightStateReader<'_, N> {
    /// Most recent snapshot, draining anything queued since the last call.
    /// `None` until the first sample arrives.
    pub fn snapshot(&mut self) -> Option<FlightState> {
        while let Some(state) = self.consumer.dequeue() {
            self.latest = Some(state);
        }
        self.latest
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn state(timestamp: f64) -> FlightState {
        FlightState {
            altitude: 100.0 + timestamp,
            velocity: 50.0,
            timestamp,
        }
    }

    #[test]
    fn snapshot_returns_latest() {
        let mut buffer: FlightStateBuffer<8> = FlightStateBuffer::new();
        let (mut writer, mut reader) = buffer.split();

        assert_eq!(reader.snapshot(), None);

        assert!(writer.push(state(0.1)));
        assert!(writer.push(state(0.2)));
        assert!(writer.push(state(0.3)));
        assert_eq!(reader.snapshot(), Some(state(0.3)));

        // no new samples: the last snapshot is retained
        assert_eq!(reader.snapshot(), Some(state(0.3)));

        assert!(writer.push(state(0.4)));
        assert_eq!(reader.snapshot(), Some(state(0.4)));
    }

    #[test]
    fn full_ring_rejects_push_until_drained() {
        let mut buffer: FlightStateBuffer<4> = FlightStateBuffer::new();
        let (mut writer, mut reader) = buffer.split();

        assert!(writer.push(state(0.1)));
        assert!(writer.push(state(0.2)));
        assert!(writer.push(state(0.3)));
        // capacity N - 1 = 3
        assert!(!writer.push(state(0.4)));

        assert_eq!(reader.snapshot(), Some(state(0.3)));
        assert!(writer.push(state(0.5)));
        assert_eq!(reader.snapshot(), Some(state(0.5)));
    }
}
