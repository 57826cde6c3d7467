use std::{collections::VecDeque, time::Duration};

use alien_maze_core::{Point, Renderer, Timestamp};

/// FIFO record of the trail markers the renderer currently shows.
#[derive(Debug)]
pub(crate) struct TrailLedger {
    capacity: usize,
    lifetime: Duration,
    markers: VecDeque<Timestamp>,
}

impl TrailLedger {
    pub(crate) fn new(capacity: usize, lifetime: Duration) -> Self {
        Self {
            capacity,
            lifetime,
            markers: VecDeque::with_capacity(capacity.saturating_add(1)),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.markers.len()
    }

    /// Emits a marker, evicting the oldest one once more than `capacity` are live.
    pub(crate) fn emit<R>(&mut self, position: Point, now: Timestamp, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        renderer.emit_trail_marker(position);
        self.markers.push_back(now);
        while self.markers.len() > self.capacity {
            self.evict_oldest(renderer);
        }
    }

    /// Evicts every marker older than the lifetime.
    pub(crate) fn expire<R>(&mut self, now: Timestamp, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        while self
            .markers
            .front()
            .is_some_and(|emitted| now.saturating_since(*emitted) >= self.lifetime)
        {
            self.evict_oldest(renderer);
        }
    }

    pub(crate) fn clear<R>(&mut self, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        while !self.markers.is_empty() {
            self.evict_oldest(renderer);
        }
    }

    fn evict_oldest<R>(&mut self, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        if self.markers.pop_front().is_some() {
            renderer.evict_oldest_trail_marker();
        }
    }
}
