/// A pull-based mono sample stream.
///
/// `render` fills as much of `out` as the stream has left and returns the
/// number of samples written; once the pattern's duration is exhausted it
/// returns 0, signaling end-of-stream. Implementations must not allocate or
/// block - `render` runs on the audio callback path.
pub trait SampleSource: Send {
    fn render(&mut self, out: &mut [f32]) -> usize;

    /// True once the stream has produced its final sample.
    fn is_finished(&self) -> bool;
}

/// Allow boxed streams to be used as streams (for dynamic dispatch).
impl SampleSource for Box<dyn SampleSource> {
    fn render(&mut self, out: &mut [f32]) -> usize {
        (**self).render(out)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}
