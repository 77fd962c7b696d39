/// Multi-channel sample buffer owned by the caller.
///
/// Voices accumulate into it (`+=`) rather than overwrite, so several
/// voices can render into the same block and their signals sum naturally.
/// The rendering core never resizes or reallocates the buffer; sizing is
/// the host's business.
#[derive(Debug, Default)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Allocate a zeroed buffer. Done by the host ahead of time, never on
    /// the audio thread.
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Add `value` to one channel at `sample_index`.
    #[inline]
    pub fn add_sample(&mut self, channel: usize, sample_index: usize, value: f32) {
        self.channels[channel][sample_index] += value;
    }

    /// Add the same value to every channel at `sample_index`. This is the
    /// per-sample write a mono voice makes into a stereo (or wider) block.
    #[inline]
    pub fn add_to_all_channels(&mut self, sample_index: usize, value: f32) {
        for channel in &mut self.channels {
            channel[sample_index] += value;
        }
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.channels[channel]
    }

    /// Zero all samples, keeping the allocation.
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }
}
