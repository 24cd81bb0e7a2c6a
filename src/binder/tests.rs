use super::*;
use crate::sink::fake::FakeSink;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    fn push(&self, s: impl Into<String>) {
        self.0.borrow_mut().push(s.into());
    }
    fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

struct FakeAdaptive {
    supported: bool,
    log: Log,
}

struct FakeDelegate {
    log: Log,
}

impl AdaptiveStreaming for FakeAdaptive {
    fn is_supported(&self) -> bool {
        self.supported
    }
    fn create(&self) -> Box<dyn StreamDelegate> {
        self.log.push("create");
        Box::new(FakeDelegate {
            log: self.log.clone(),
        })
    }
}

impl StreamDelegate for FakeDelegate {
    fn load_source(&mut self, url: &str) -> Result<(), TransportError> {
        self.log.push(format!("load {url}"));
        Ok(())
    }
    fn attach(&mut self, sink: &mut dyn MediaSink) -> Result<(), TransportError> {
        self.log.push("attach");
        sink.set_source(Some("blob:segmented"));
        Ok(())
    }
    fn destroy(&mut self) {
        self.log.push("destroy");
    }
}

fn ctx() -> BindContext {
    BindContext {
        index: 0,
        paused: true,
    }
}

#[test]
fn segmented_url_detection_matches_extension_cue() {
    assert!(is_segmented_url("https://a/b/index.m3u8"));
    assert!(is_segmented_url("https://a/b/index.M3U8?token=1"));
    assert!(is_segmented_url("https://a/b/index.m3u8#t=3"));
    assert!(!is_segmented_url("https://a/b/index.m3u8.mp3"));
    assert!(!is_segmented_url("https://a/b/song.mp3"));
}

#[test]
fn auto_binds_plain_urls_directly() {
    let mut binder = SourceBinder::new();
    let fake = FakeSink::new();
    let mut sink = fake.clone();

    let b = binder
        .bind(&mut sink, &Track::new("/music/a.mp3"), &ctx())
        .unwrap();
    assert_eq!(b, Binding::Direct);
    assert_eq!(fake.state().src.as_deref(), Some("/music/a.mp3"));
}

#[test]
fn auto_segmented_url_goes_through_delegate() {
    let log = Log::default();
    let mut binder = SourceBinder::new();
    binder.set_adaptive(Box::new(FakeAdaptive {
        supported: true,
        log: log.clone(),
    }));
    let fake = FakeSink::new();
    let mut sink = fake.clone();

    let b = binder
        .bind(&mut sink, &Track::new("https://x/live.m3u8"), &ctx())
        .unwrap();
    assert_eq!(b, Binding::Adaptive);
    assert!(binder.has_delegate());
    assert_eq!(
        log.entries(),
        vec!["create", "load https://x/live.m3u8", "attach"]
    );
    assert_eq!(fake.state().src.as_deref(), Some("blob:segmented"));
}

#[test]
fn previous_delegate_is_released_before_rebinding() {
    let log = Log::default();
    let mut binder = SourceBinder::new();
    binder.set_adaptive(Box::new(FakeAdaptive {
        supported: true,
        log: log.clone(),
    }));
    let mut sink = FakeSink::new();

    binder
        .bind(&mut sink, &Track::new("https://x/1.m3u8"), &ctx())
        .unwrap();
    binder
        .bind(&mut sink, &Track::new("/local/2.mp3"), &ctx())
        .unwrap();

    assert!(!binder.has_delegate());
    assert_eq!(log.entries().last().map(String::as_str), Some("destroy"));

    binder.release();
    let destroys = log.entries().iter().filter(|e| *e == "destroy").count();
    assert_eq!(destroys, 1);
}

#[test]
fn unsupported_delegate_falls_back_to_native_sink_support() {
    let mut binder = SourceBinder::new();
    binder.set_adaptive(Box::new(FakeAdaptive {
        supported: false,
        log: Log::default(),
    }));
    let fake = FakeSink::new().with_native("application/vnd.apple.mpegURL");
    let mut sink = fake.clone();

    let b = binder
        .bind(&mut sink, &Track::new("https://x/live.m3u8"), &ctx())
        .unwrap();
    assert_eq!(b, Binding::NativeAdaptive);
    assert_eq!(fake.state().src.as_deref(), Some("https://x/live.m3u8"));
}

#[test]
fn no_adaptive_support_leaves_sink_unbound() {
    let mut binder = SourceBinder::new();
    let fake = FakeSink::new();
    let mut sink = fake.clone();
    sink.set_source(Some("old.mp3"));

    let err = binder
        .bind(
            &mut sink,
            &Track::new("https://x/stream").with_kind(TransportKind::Hls),
            &ctx(),
        )
        .unwrap_err();
    assert!(matches!(err, TransportError::Unsupported(_)));
    assert_eq!(fake.state().src, None);
}

#[test]
fn custom_transport_takes_precedence_over_builtin_types() {
    let mut binder = SourceBinder::new();
    let calls = Rc::new(RefCell::new(0));
    {
        let calls = calls.clone();
        binder
            .register(
                "hls",
                Box::new(
                    move |sink: &mut dyn MediaSink,
                          track: &Track,
                          _: &BindContext|
                          -> Result<(), TransportError> {
                        *calls.borrow_mut() += 1;
                        sink.set_source(Some(&format!("custom:{}", track.url)));
                        Ok(())
                    },
                ),
            )
            .unwrap();
    }
    let fake = FakeSink::new();
    let mut sink = fake.clone();

    let track = Track::new("https://x/a.m3u8").with_kind(TransportKind::Hls);
    let b = binder.bind(&mut sink, &track, &ctx()).unwrap();
    assert_eq!(b, Binding::Custom("hls".into()));
    assert_eq!(*calls.borrow(), 1);
    assert_eq!(fake.state().src.as_deref(), Some("custom:https://x/a.m3u8"));
}

#[test]
fn unknown_custom_type_is_reported_and_not_bound() {
    let mut binder = SourceBinder::new();
    let fake = FakeSink::new();
    let mut sink = fake.clone();
    let track = Track::new("x.flv").with_kind(TransportKind::Custom("flv".into()));

    assert_eq!(binder.route(&track), Route::Unknown("flv".into()));
    let err = binder.bind(&mut sink, &track, &ctx()).unwrap_err();
    assert!(matches!(err, TransportError::UnknownCustomType(ref n) if n == "flv"));
    assert_eq!(fake.state().src, None);
}

#[test]
fn register_validates_names_up_front() {
    let mut binder = SourceBinder::new();
    let noop = |_: &mut dyn MediaSink, _: &Track, _: &BindContext| -> Result<(), TransportError> {
        Ok(())
    };

    assert!(matches!(
        binder.register("  ", Box::new(noop)),
        Err(TransportError::InvalidName(_))
    ));
    assert!(matches!(
        binder.register("auto", Box::new(noop)),
        Err(TransportError::InvalidName(_))
    ));
    binder.register("flv", Box::new(noop)).unwrap();
    assert!(matches!(
        binder.register("flv", Box::new(noop)),
        Err(TransportError::DuplicateName(_))
    ));
}
