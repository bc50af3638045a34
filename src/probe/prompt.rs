//! Asynchronous annotation requests
//!
//! A double-click on a handle hands the host an `AnnotationPrompt`. The host
//! shows its text input whenever it likes and answers through the prompt;
//! the probe picks the answer up on its next render.

use futures::channel::oneshot;

use crate::domain::{AnnotatedPoint, PointId};

/// Request for annotation text, completed by the host
#[derive(Debug)]
pub struct AnnotationPrompt {
    point: PointId,
    current: String,
    reply: oneshot::Sender<String>,
}

impl AnnotationPrompt {
    /// Measurement the text will be attached to
    pub fn point(&self) -> PointId {
        self.point
    }

    /// Annotation the measurement carries right now, to prefill the input
    pub fn current_text(&self) -> &str {
        &self.current
    }

    /// Answer with `text`; an empty string clears the annotation
    pub fn submit(self, text: impl Into<String>) {
        if self.reply.send(text.into()).is_err() {
            log::debug!("annotation for point {} arrived after the tool went away", self.point.get());
        }
    }

    /// Dismiss the prompt, leaving the annotation untouched
    pub fn cancel(self) {}
}

#[derive(Debug)]
enum Reply {
    Waiting(oneshot::Receiver<String>),
    Ready(String),
}

/// Tool-side half of an outstanding prompt
#[derive(Debug)]
pub(crate) struct PendingAnnotation {
    point: PointId,
    reply: Reply,
}

pub(crate) enum Progress {
    Waiting,
    Cancelled,
    Ready(String),
}

impl PendingAnnotation {
    pub(crate) fn point(&self) -> PointId {
        self.point
    }

    pub(crate) fn poll(&mut self) -> Progress {
        let received = match &mut self.reply {
            Reply::Ready(text) => return Progress::Ready(text.clone()),
            Reply::Waiting(receiver) => receiver.try_recv(),
        };
        match received {
            Ok(None) => Progress::Waiting,
            Ok(Some(text)) => {
                self.reply = Reply::Ready(text.clone());
                Progress::Ready(text)
            }
            Err(oneshot::Canceled) => Progress::Cancelled,
        }
    }
}

pub(crate) fn request(point: &AnnotatedPoint) -> (AnnotationPrompt, PendingAnnotation) {
    let (sender, receiver) = oneshot::channel();
    let prompt = AnnotationPrompt {
        point: point.id,
        current: point.annotation.clone(),
        reply: sender,
    };
    let pending = PendingAnnotation {
        point: point.id,
        reply: Reply::Waiting(receiver),
    };
    (prompt, pending)
}
