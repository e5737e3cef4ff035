//! The parse-lifecycle event bus. Handlers run in registration order and
//! may mutate the event payload; a handler error aborts the emit.

use crate::doclet::Doclet;
use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ParseBegin,
    FileBegin,
    BeforeParse,
    JsdocCommentFound,
    SymbolFound,
    NewDoclet,
    FileComplete,
    ParseComplete,
    ProcessingComplete,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ParseBegin => "parseBegin",
            EventKind::FileBegin => "fileBegin",
            EventKind::BeforeParse => "beforeParse",
            EventKind::JsdocCommentFound => "jsdocCommentFound",
            EventKind::SymbolFound => "symbolFound",
            EventKind::NewDoclet => "newDoclet",
            EventKind::FileComplete => "fileComplete",
            EventKind::ParseComplete => "parseComplete",
            EventKind::ProcessingComplete => "processingComplete",
        }
    }
}

/// Event payloads. `BeforeParse` source and `NewDoclet` doclets are
/// mutable in place so handlers can rewrite them.
#[derive(Debug)]
pub enum EventData {
    ParseBegin {
        sourcefiles: Vec<String>,
    },
    FileBegin {
        filename: String,
    },
    BeforeParse {
        filename: String,
        source: String,
    },
    JsdocCommentFound {
        filename: String,
        lineno: usize,
        comment: String,
    },
    SymbolFound {
        filename: String,
        lineno: usize,
        code_name: String,
    },
    NewDoclet {
        doclet: Doclet,
    },
    FileComplete {
        filename: String,
    },
    ParseComplete {
        sourcefiles: Vec<String>,
        doclet_count: usize,
    },
    ProcessingComplete {
        doclet_count: usize,
    },
}

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::ParseBegin { .. } => EventKind::ParseBegin,
            EventData::FileBegin { .. } => EventKind::FileBegin,
            EventData::BeforeParse { .. } => EventKind::BeforeParse,
            EventData::JsdocCommentFound { .. } => EventKind::JsdocCommentFound,
            EventData::SymbolFound { .. } => EventKind::SymbolFound,
            EventData::NewDoclet { .. } => EventKind::NewDoclet,
            EventData::FileComplete { .. } => EventKind::FileComplete,
            EventData::ParseComplete { .. } => EventKind::ParseComplete,
            EventData::ProcessingComplete { .. } => EventKind::ProcessingComplete,
        }
    }
}

#[derive(Debug)]
pub struct Event {
    pub data: EventData,
    default_prevented: bool,
}

impl Event {
    pub fn new(data: EventData) -> Event {
        Event {
            data,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }

    /// Ask the emitter to discard the event's default effect, such as
    /// keeping a new doclet.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type Handler = Box<dyn FnMut(&mut Event) -> Result<()>>;

/// Handlers per event kind, run first-registered-first.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&mut Event) -> Result<()> + 'static,
    {
        self.handlers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    /// Run all handlers for the event's kind. The first handler error
    /// stops the run and propagates.
    pub fn emit(&mut self, event: &mut Event) -> Result<()> {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers {
                handler(event)?;
            }
        }
        Ok(())
    }
}

/// Convenience for handlers that need to fail.
pub fn handler_error(event: EventKind, message: impl Into<String>) -> Error {
    Error::Handler {
        event: event.as_str().to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn handlers_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for label in ["first", "second", "third"] {
            let seen = seen.clone();
            bus.on(EventKind::FileBegin, move |_| {
                seen.borrow_mut().push(label);
                Ok(())
            });
        }

        let mut event = Event::new(EventData::FileBegin {
            filename: "a.js".to_string(),
        });
        bus.emit(&mut event).unwrap();
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn handlers_only_see_their_kind() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = count.clone();
        bus.on(EventKind::NewDoclet, move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });

        let mut event = Event::new(EventData::FileComplete {
            filename: "a.js".to_string(),
        });
        bus.emit(&mut event).unwrap();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn prevent_default_is_visible_to_the_emitter() {
        let mut bus = EventBus::new();
        bus.on(EventKind::NewDoclet, |event| {
            if let EventData::NewDoclet { doclet } = &event.data {
                if doclet.ignore {
                    event.prevent_default();
                }
            }
            Ok(())
        });

        let mut doclet = crate::doclet::Doclet::default();
        doclet.ignore = true;
        let mut event = Event::new(EventData::NewDoclet { doclet });
        bus.emit(&mut event).unwrap();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn handler_error_stops_the_run() {
        let reached = Rc::new(RefCell::new(false));
        let mut bus = EventBus::new();
        bus.on(EventKind::BeforeParse, |event| {
            Err(handler_error(event.kind(), "refusing to parse"))
        });
        let r = reached.clone();
        bus.on(EventKind::BeforeParse, move |_| {
            *r.borrow_mut() = true;
            Ok(())
        });

        let mut event = Event::new(EventData::BeforeParse {
            filename: "a.js".to_string(),
            source: String::new(),
        });
        assert!(bus.emit(&mut event).is_err());
        assert!(!*reached.borrow());
    }

    #[test]
    fn before_parse_source_is_mutable() {
        let mut bus = EventBus::new();
        bus.on(EventKind::BeforeParse, |event| {
            if let EventData::BeforeParse { source, .. } = &mut event.data {
                source.push_str("\n/** @member injected */");
            }
            Ok(())
        });

        let mut event = Event::new(EventData::BeforeParse {
            filename: "a.js".to_string(),
            source: "let x;".to_string(),
        });
        bus.emit(&mut event).unwrap();
        match event.data {
            EventData::BeforeParse { source, .. } => assert!(source.contains("injected")),
            _ => unreachable!(),
        }
    }
}
