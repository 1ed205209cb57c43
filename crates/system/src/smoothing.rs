/// Fixed-window moving average over the last `capacity` samples.
///
/// Slots are written round-robin and the running sum is updated
/// incrementally, so every push is O(1).  The sum is re-derived from the
/// slots each time the write position wraps, which keeps float drift from
/// accumulating over a long-running process.
#[derive(Debug, Clone)]
pub struct SmoothingBuffer {
    samples: Vec<f64>,
    pos:     usize,
    sum:     f64,
}

impl SmoothingBuffer {
    /// Fill every slot with `initial` so the first average is already exact.
    ///
    /// A `capacity` of zero is treated as one.
    pub fn new(capacity: usize, initial: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: vec![initial; capacity],
            pos:     0,
            sum:     initial * capacity as f64,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Overwrite the oldest sample with `value` and return the new average.
    pub fn push(&mut self, value: f64) -> f64 {
        let evicted = std::mem::replace(&mut self.samples[self.pos], value);
        self.sum += value - evicted;
        self.pos = (self.pos + 1) % self.samples.len();

        if self.pos == 0 {
            self.sum = self.samples.iter().sum();
        }
        self.average()
    }

    /// Discard all history and refill with `value`.
    pub fn reset(&mut self, value: f64) {
        self.samples.fill(value);
        self.pos = 0;
        self.sum = value * self.samples.len() as f64;
    }

    pub fn average(&self) -> f64 {
        self.sum / self.samples.len() as f64
    }
}

/// A [`SmoothingBuffer`] that is created from the first observed value
/// instead of being pre-filled with zeros.
#[derive(Debug, Clone)]
pub struct Smoother {
    window: usize,
    buffer: Option<SmoothingBuffer>,
}

impl Smoother {
    pub fn new(window: usize) -> Self {
        Self { window, buffer: None }
    }

    pub fn push(&mut self, value: f64) -> f64 {
        match &mut self.buffer {
            Some(buffer) => buffer.push(value),
            None => self.reset(value),
        }
    }

    /// Forget everything seen so far; `value` becomes the whole window.
    pub fn reset(&mut self, value: f64) -> f64 {
        match &mut self.buffer {
            Some(buffer) => buffer.reset(value),
            None => self.buffer = Some(SmoothingBuffer::new(self.window, value)),
        }
        value
    }

    /// Current average, `None` until the first push.
    pub fn average(&self) -> Option<f64> {
        self.buffer.as_ref().map(SmoothingBuffer::average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefilled_average_is_initial_value() {
        let buffer = SmoothingBuffer::new(5, 42.0);
        assert_eq!(buffer.average(), 42.0);
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn constant_input_converges() {
        let mut buffer = SmoothingBuffer::new(4, 0.0);
        let mut avg = 0.0;
        for _ in 0..4 {
            avg = buffer.push(10.0);
        }
        assert_eq!(avg, 10.0);
    }

    #[test]
    fn full_window_is_plain_mean_across_wrap() {
        let mut buffer = SmoothingBuffer::new(3, 100.0);
        // Move the write position off zero first so the window straddles the wrap.
        buffer.push(7.0);
        buffer.push(1.0);
        buffer.push(2.0);
        let avg = buffer.push(6.0);
        assert_eq!(avg, 3.0);
    }

    #[test]
    fn partial_window_blends_with_prefill() {
        let mut buffer = SmoothingBuffer::new(4, 50.0);
        assert_eq!(buffer.push(70.0), 55.0);
    }

    #[test]
    fn zero_capacity_acts_like_one() {
        let mut buffer = SmoothingBuffer::new(0, 1.0);
        assert_eq!(buffer.push(9.0), 9.0);
    }

    #[test]
    fn reset_discards_history() {
        let mut buffer = SmoothingBuffer::new(3, 1.0);
        buffer.push(100.0);
        buffer.reset(5.0);
        assert_eq!(buffer.average(), 5.0);
        assert_eq!(buffer.push(5.0), 5.0);
    }

    #[test]
    fn smoother_primes_from_first_value() {
        let mut smoother = Smoother::new(10);
        assert_eq!(smoother.average(), None);
        assert_eq!(smoother.push(30.0), 30.0);
        assert_eq!(smoother.average(), Some(30.0));
    }
}
