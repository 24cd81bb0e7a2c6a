use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn handlers_run_in_registration_order() {
    let bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for n in 0..3 {
        let seen = seen.clone();
        bus.on(MediaEvent::Ended, move |_| seen.borrow_mut().push(n));
    }
    bus.trigger(&Event::Media(MediaEvent::Ended));

    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
}

#[test]
fn trigger_without_subscribers_is_a_no_op() {
    let bus = EventBus::new();
    bus.trigger(&Event::NoticeHide);
    assert_eq!(bus.handler_count(Topic::NoticeHide), 0);
}

#[test]
fn off_detaches_only_the_given_handler() {
    let bus = EventBus::new();
    let hits = Rc::new(RefCell::new(Vec::new()));

    let a = {
        let hits = hits.clone();
        bus.on(Topic::Destroy, move |_| hits.borrow_mut().push("a"))
    };
    {
        let hits = hits.clone();
        bus.on(Topic::Destroy, move |_| hits.borrow_mut().push("b"));
    }

    assert!(bus.off(&a));
    assert!(!bus.off(&a));
    bus.trigger(&Event::Destroy);
    assert_eq!(*hits.borrow(), vec!["b"]);
}

#[test]
fn payload_reaches_handler() {
    let bus = EventBus::new();
    let got = Rc::new(RefCell::new(None));
    {
        let got = got.clone();
        bus.on(Topic::NoticeShow, move |e| {
            if let Event::NoticeShow(text) = e {
                *got.borrow_mut() = Some(text.clone());
            }
        });
    }
    bus.trigger(&Event::NoticeShow("hello".into()));
    assert_eq!(got.borrow().as_deref(), Some("hello"));
}

#[test]
fn handler_may_subscribe_during_dispatch() {
    let bus = EventBus::new();
    let inner_bus = bus.clone();
    bus.on(Topic::ListClear, move |_| {
        inner_bus.on(Topic::ListClear, |_| {});
    });

    bus.trigger(&Event::ListClear);
    assert_eq!(bus.handler_count(Topic::ListClear), 2);
}

#[test]
#[should_panic(expected = "boom")]
fn handler_panic_propagates_to_trigger_caller() {
    let bus = EventBus::new();
    bus.on(Topic::Destroy, |_| panic!("boom"));
    bus.trigger(&Event::Destroy);
}
