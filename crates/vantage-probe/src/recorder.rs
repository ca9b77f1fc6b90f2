//! Observers used while replaying a drag

use std::io::{self, Write};

use vantage_control::{PanGesture, PanObserver, PanSample, TracingObserver};

pub const CSV_HEADER: &str = "frame,cursor_x,cursor_y,cam_x,cam_y,cam_z,anchor_x,anchor_y";

/// Writes one CSV row per pan step.
///
/// Observer callbacks can't fail, so the first write error is kept and
/// reported by [`finish`](Self::finish).
pub struct CsvPanRecorder<W: Write> {
    out: W,
    wrote_header: bool,
    error: Option<io::Error>,
}

impl<W: Write> CsvPanRecorder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            wrote_header: false,
            error: None,
        }
    }

    fn write_row(&mut self, sample: &PanSample) -> io::Result<()> {
        if !self.wrote_header {
            writeln!(self.out, "{CSV_HEADER}")?;
            self.wrote_header = true;
        }
        writeln!(
            self.out,
            "{},{},{},{},{},{},{},{}",
            sample.frame,
            sample.cursor.x,
            sample.cursor.y,
            sample.camera_position.x,
            sample.camera_position.y,
            sample.camera_position.z,
            sample.anchor_screen.x,
            sample.anchor_screen.y,
        )
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> PanObserver for CsvPanRecorder<W> {
    fn on_step(&mut self, sample: &PanSample) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_row(sample) {
            tracing::warn!("csv write failed: {e}");
            self.error = Some(e);
        }
    }
}

/// Collects every sample, forwarding to tracing and an optional CSV sink.
pub struct ReplayLog {
    pub samples: Vec<PanSample>,
    pub gesture: Option<PanGesture>,
    csv: Option<CsvPanRecorder<Box<dyn Write>>>,
}

impl ReplayLog {
    pub fn new(csv: Option<Box<dyn Write>>) -> Self {
        Self {
            samples: Vec::new(),
            gesture: None,
            csv: csv.map(CsvPanRecorder::new),
        }
    }

    pub fn max_pin_error(&self) -> f32 {
        self.samples
            .iter()
            .map(PanSample::pin_error)
            .fold(0.0, f32::max)
    }

    /// Flush the CSV sink, if any
    pub fn finish(&mut self) -> io::Result<()> {
        match self.csv.take() {
            Some(csv) => csv.finish().map(drop),
            None => Ok(()),
        }
    }
}

impl PanObserver for ReplayLog {
    fn on_begin(&mut self, gesture: &PanGesture) {
        self.gesture = Some(*gesture);
        TracingObserver.on_begin(gesture);
    }

    fn on_step(&mut self, sample: &PanSample) {
        self.samples.push(*sample);
        TracingObserver.on_step(sample);
        if let Some(csv) = &mut self.csv {
            csv.on_step(sample);
        }
    }

    fn on_end(&mut self) {
        TracingObserver.on_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    fn sample(frame: u32) -> PanSample {
        PanSample {
            frame,
            cursor: Vec2::new(10.0, 20.0),
            camera_position: Vec3::new(1.0, 2.0, 3.0),
            anchor_screen: Vec2::new(10.5, 20.0),
        }
    }

    #[test]
    fn test_csv_rows() {
        let mut recorder = CsvPanRecorder::new(Vec::new());
        recorder.on_step(&sample(1));
        recorder.on_step(&sample(2));

        let text = String::from_utf8(recorder.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,10,20,1,2,3,10.5,20");
        assert!(lines[2].starts_with("2,"));
    }

    #[test]
    fn test_csv_empty_without_steps() {
        let recorder = CsvPanRecorder::new(Vec::new());
        assert!(recorder.finish().unwrap().is_empty());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_csv_error_surfaces_on_finish() {
        let mut recorder = CsvPanRecorder::new(FailingWriter);
        recorder.on_step(&sample(1));
        recorder.on_step(&sample(2));
        assert!(recorder.finish().is_err());
    }

    #[test]
    fn test_replay_log_collects() {
        let mut log = ReplayLog::new(None);
        log.on_step(&sample(1));
        log.on_step(&PanSample {
            anchor_screen: Vec2::new(13.0, 24.0),
            ..sample(2)
        });

        assert_eq!(log.samples.len(), 2);
        assert_eq!(log.max_pin_error(), 5.0);
        assert!(log.finish().is_ok());
    }
}
