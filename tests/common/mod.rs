//! Scripted test doubles for the capability traits.
//!
//! Every double appends to a shared [`Journal`] so tests can assert on the
//! exact order of opens, reads, writes, renders, waits and releases.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cv_helper::{
    Backend, Capture, Display, Encoder, EncoderSettings, Frame, FrameSize, HelperError, KeyPress,
    Keys, Result, Source, Wait,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    OpenCapture(Source),
    OpenEncoder(EncoderSettings),
    ReadImage(PathBuf),
    /// Frame number (1-based) handed out by the capture
    Read(u8),
    Write(u8),
    Render(String, u8),
    WaitKey(Wait),
    ReleaseCapture,
    ReleaseEncoder,
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn renders(&self) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Render(_, n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn capture_releases(&self) -> usize {
        self.count(|e| *e == Event::ReleaseCapture)
    }

    pub fn encoder_releases(&self) -> usize {
        self.count(|e| *e == Event::ReleaseEncoder)
    }

    pub fn waits(&self) -> usize {
        self.count(|e| matches!(e, Event::WaitKey(_)))
    }
}

/// Frame whose every byte is `n`, so the journal can identify it.
pub fn numbered_frame(size: FrameSize, n: u8) -> Frame {
    Frame::filled(size, [n, n, n])
}

pub struct FakeBackend {
    pub journal: Journal,
    pub size: FrameSize,
    /// Frames each capture yields before end of stream
    pub frames: u8,
    /// Read of this frame number fails with an error instead
    pub read_error_at: Option<u8>,
    pub fail_open: bool,
    pub fail_encoder_open: bool,
    /// Write of this frame number fails
    pub write_error_at: Option<u8>,
    pub image: Option<Frame>,
}

impl FakeBackend {
    pub fn new(journal: &Journal, frames: u8) -> Self {
        Self {
            journal: journal.clone(),
            size: FrameSize::new(8, 6),
            frames,
            read_error_at: None,
            fail_open: false,
            fail_encoder_open: false,
            write_error_at: None,
            image: None,
        }
    }
}

impl Backend for FakeBackend {
    type Capture = FakeCapture;
    type Encoder = FakeEncoder;

    fn open_capture(&mut self, source: &Source) -> Result<FakeCapture> {
        self.journal.push(Event::OpenCapture(source.clone()));
        if self.fail_open {
            return Err(HelperError::SourceUnavailable {
                source_id: source.to_string(),
                reason: "scripted open failure".to_string(),
            });
        }
        Ok(FakeCapture {
            journal: self.journal.clone(),
            size: self.size,
            total: self.frames,
            next: 1,
            read_error_at: self.read_error_at,
        })
    }

    fn open_encoder(&mut self, settings: &EncoderSettings) -> Result<FakeEncoder> {
        self.journal.push(Event::OpenEncoder(settings.clone()));
        if self.fail_encoder_open {
            return Err(HelperError::Encoder("scripted encoder failure".to_string()));
        }
        Ok(FakeEncoder {
            journal: self.journal.clone(),
            write_error_at: self.write_error_at,
        })
    }

    fn read_image(&mut self, path: &Path) -> Result<Frame> {
        self.journal.push(Event::ReadImage(path.to_path_buf()));
        self.image.clone().ok_or_else(|| HelperError::DecodeFailed {
            path: path.to_path_buf(),
            reason: "scripted decode failure".to_string(),
        })
    }
}

pub struct FakeCapture {
    journal: Journal,
    size: FrameSize,
    total: u8,
    next: u8,
    read_error_at: Option<u8>,
}

impl Capture for FakeCapture {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn frame_rate(&self) -> Option<f64> {
        Some(30.0)
    }

    fn read(&mut self) -> Result<Option<Frame>> {
        if self.read_error_at == Some(self.next) {
            return Err(HelperError::DecodeFailed {
                path: PathBuf::from("fake"),
                reason: "scripted read failure".to_string(),
            });
        }
        if self.next > self.total {
            return Ok(None);
        }
        let n = self.next;
        self.next += 1;
        self.journal.push(Event::Read(n));
        Ok(Some(numbered_frame(self.size, n)))
    }

    fn release(&mut self) {
        self.journal.push(Event::ReleaseCapture);
    }
}

pub struct FakeEncoder {
    journal: Journal,
    write_error_at: Option<u8>,
}

impl Encoder for FakeEncoder {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        let n = frame.data[0];
        if self.write_error_at == Some(n) {
            return Err(HelperError::Encoder("scripted write failure".to_string()));
        }
        self.journal.push(Event::Write(n));
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.journal.push(Event::ReleaseEncoder);
        Ok(())
    }
}

pub struct FakeDisplay {
    journal: Journal,
    /// Report the window closed when asked to render this frame number
    pub closed_at: Option<u8>,
    /// Fail to render this frame number
    pub error_at: Option<u8>,
    pub closes: usize,
}

impl FakeDisplay {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            closed_at: None,
            error_at: None,
            closes: 0,
        }
    }
}

impl Display for FakeDisplay {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<()> {
        let n = frame.data[0];
        if self.closed_at == Some(n) {
            return Err(HelperError::WindowClosed);
        }
        if self.error_at == Some(n) {
            return Err(HelperError::Display("scripted render failure".to_string()));
        }
        self.journal.push(Event::Render(title.to_string(), n));
        Ok(())
    }

    fn close_all(&mut self) {
        self.closes += 1;
    }
}

/// Key source that replays a script, one entry per wait; `None` after it runs out.
pub struct ScriptedKeys {
    journal: Journal,
    script: VecDeque<Option<KeyPress>>,
}

impl ScriptedKeys {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            script: VecDeque::new(),
        }
    }

    /// Press `key` during the wait that follows frame `frame` (1-based).
    pub fn press_on_frame(journal: &Journal, frame: usize, key: KeyPress) -> Self {
        let mut script: VecDeque<Option<KeyPress>> = std::iter::repeat(None).take(frame - 1).collect();
        script.push_back(Some(key));
        Self {
            journal: journal.clone(),
            script,
        }
    }

    pub fn with_script(journal: &Journal, script: Vec<Option<KeyPress>>) -> Self {
        Self {
            journal: journal.clone(),
            script: script.into(),
        }
    }
}

impl Keys for ScriptedKeys {
    fn wait_key(&mut self, wait: Wait) -> Option<KeyPress> {
        self.journal.push(Event::WaitKey(wait));
        self.script.pop_front().flatten()
    }
}
