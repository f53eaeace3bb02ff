//! End-to-end pipeline tests: builder, transport, lifecycle events, sharing.

use std::{
  cell::RefCell,
  collections::BTreeMap,
  rc::Rc,
};

use futures::{executor::LocalPool, future::LocalBoxFuture};
use rxhttp::prelude::*;
use serde_json::{json, Value};

#[derive(Default)]
struct Recorder {
  events: RefCell<Vec<String>>,
  calls: RefCell<Vec<(String, RequestParts)>>,
}

impl Recorder {
  fn event_names(&self) -> Vec<String> { self.events.borrow().clone() }

  fn urls(&self) -> Vec<String> {
    self.calls.borrow().iter().map(|(url, _)| url.clone()).collect()
  }
}

struct Harness {
  pool: LocalPool,
  recorder: Rc<Recorder>,
  service: HttpService,
}

/// A service whose transport answers from a fixed response and whose dispatch
/// sink records event names in arrival order.
fn harness(result: Result<Response, TransportError>) -> Harness {
  let pool = LocalPool::new();
  let recorder = Rc::new(Recorder::default());

  let transport_recorder = recorder.clone();
  let transport: Rc<dyn Transport> = Rc::new(
    move |url: &str,
          parts: RequestParts|
          -> LocalBoxFuture<'static, Result<Response, TransportError>> {
      transport_recorder.calls.borrow_mut().push((url.to_string(), parts));
      Box::pin(futures::future::ready(result.clone()))
    },
  );

  let event_recorder = recorder.clone();
  let dispatch: Rc<dyn Fn(&str, LifecycleEvent)> = Rc::new(move |name, event| {
    let kind = match event {
      LifecycleEvent::Request(_) => "request",
      LifecycleEvent::Success(_) => "success",
      LifecycleEvent::Failure(_) => "failure",
    };
    event_recorder.events.borrow_mut().push(format!("{name} [{kind}]"));
  });

  let service = HttpService::new(transport, dispatch, Rc::new(pool.spawner()));
  Harness { pool, recorder, service }
}

#[test]
fn success_dispatches_request_then_success() {
  let mut h = harness(Ok(Response::new(200, r#"{"id": 1}"#)));
  let api = h.service.host("https://api").get("/users").response(as_json());

  let seen = Rc::new(RefCell::new(vec![]));
  let completed = Rc::new(RefCell::new(false));
  let c_seen = seen.clone();
  let c_completed = completed.clone();
  api.send().subscribe_all(
    move |v| c_seen.borrow_mut().push(v),
    |e| panic!("unexpected error: {e}"),
    move || *c_completed.borrow_mut() = true,
  );
  h.pool.run_until_stalled();

  assert_eq!(*seen.borrow(), vec![json!({"id": 1})]);
  assert!(*completed.borrow());
  assert_eq!(
    h.recorder.event_names(),
    vec![
      "GET https://api/users.REQUEST [request]",
      "GET https://api/users.SUCCESS [success]",
    ]
  );
  assert_eq!(h.recorder.urls(), vec!["https://api/users"]);
}

#[test]
fn transport_failure_dispatches_failure() {
  let mut h = harness(Err(TransportError("connection refused".into())));
  let api = h.service.get("/ping");

  let errs = Rc::new(RefCell::new(vec![]));
  let c_errs = errs.clone();
  api.send().subscribe_all(
    |_| panic!("no value on transport failure"),
    move |e| c_errs.borrow_mut().push(e),
    || panic!("no completion on transport failure"),
  );
  h.pool.run_until_stalled();

  assert!(matches!(errs.borrow()[0], HttpError::Transport(_)));
  assert_eq!(
    h.recorder.event_names(),
    vec!["GET /ping.REQUEST [request]", "GET /ping.FAILURE [failure]"]
  );
}

#[test]
fn status_failure_raises_transformed_response() {
  let mut h = harness(Ok(Response::new(404, r#"{"message": "missing"}"#)));
  let api = h.service.get("/users/9").response(as_json());

  let errs = Rc::new(RefCell::new(vec![]));
  let c_errs = errs.clone();
  api.send().subscribe_err(|_| {}, move |e| c_errs.borrow_mut().push(e));
  h.pool.run_until_stalled();

  match &errs.borrow()[0] {
    HttpError::Status(value) => assert_eq!(value, &json!({"message": "missing"})),
    other => panic!("expected status error, got {other}"),
  };
}

#[test]
fn catch_error_maps_the_raised_value() {
  let mut h = harness(Ok(Response::new(500, r#"{"message": "broken"}"#)));
  let api = h
    .service
    .get("/users")
    .response(as_json())
    .catch_error(Rc::new(|value| {
      value.get("message").map(|m| json!({ "friendly": m }))
    }));

  let errs = Rc::new(RefCell::new(vec![]));
  let c_errs = errs.clone();
  api.send().subscribe_err(|_| {}, move |e| c_errs.borrow_mut().push(e));
  h.pool.run_until_stalled();

  match &errs.borrow()[0] {
    HttpError::Status(value) => assert_eq!(value, &json!({"friendly": "broken"})),
    other => panic!("expected status error, got {other}"),
  };
}

#[test]
fn catch_error_none_keeps_transformed_value() {
  let mut h = harness(Ok(Response::new(500, r#"{"code": 3}"#)));
  let api = h.service.get("/users").response(as_json()).catch_error(Rc::new(|_| None));

  let errs = Rc::new(RefCell::new(vec![]));
  let c_errs = errs.clone();
  api.send().subscribe_err(|_| {}, move |e| c_errs.borrow_mut().push(e));
  h.pool.run_until_stalled();

  match &errs.borrow()[0] {
    HttpError::Status(value) => assert_eq!(value, &json!({"code": 3})),
    other => panic!("expected status error, got {other}"),
  };
}

#[test]
fn query_string_reaches_transport_and_event_names() {
  let mut h = harness(Ok(Response::new(200, "[]")));
  let query: BTreeMap<String, Value> =
    [("page".to_string(), json!(2)), ("q".to_string(), json!("a b"))].into_iter().collect();
  let api = h.service.get("/search").query(query);

  api.send().subscribe(|_| {});
  h.pool.run_until_stalled();

  assert_eq!(h.recorder.urls(), vec!["/search?page=2&q=a%20b"]);
  assert_eq!(
    h.recorder.event_names()[0],
    "GET /search?page=2&q=a%20b.REQUEST [request]"
  );
}

#[test]
fn body_parser_shapes_the_sent_body() {
  let mut h = harness(Ok(Response::new(201, "done")));
  let api = h
    .service
    .post("/users")
    .body(json!({"name": "b"}))
    .body_parser(Rc::new(|body, _| Ok(json!({ "wrapped": body }))));

  api.send().subscribe(|_| {});
  h.pool.run_until_stalled();

  let calls = h.recorder.calls.borrow();
  assert_eq!(calls[0].1.method, "POST");
  assert_eq!(calls[0].1.body, Some(json!({"wrapped": {"name": "b"}})));
}

#[test]
fn pre_flight_patch_is_sent() {
  let mut h = harness(Ok(Response::new(200, "ok")));
  let hook: PreFlight = Rc::new(|_| {
    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), "Bearer token".to_string());
    Ok(ConfigPatch { headers: Some(headers), ..Default::default() })
  });
  let api = h.service.get("/secure").pre_flight(hook);

  api.send().subscribe(|_| {});
  h.pool.run_until_stalled();

  let calls = h.recorder.calls.borrow();
  assert_eq!(calls[0].1.headers.get("Authorization"), Some(&"Bearer token".to_string()));
}

#[test]
fn hook_failure_errors_without_lifecycle_events() {
  let mut h = harness(Ok(Response::new(200, "ok")));
  let api = h.service.get("/users").pre_flight(Rc::new(|_| Err(HttpError::hook("no session"))));

  let errs = Rc::new(RefCell::new(vec![]));
  let c_errs = errs.clone();
  api.send().subscribe_err(|_| {}, move |e| c_errs.borrow_mut().push(e));
  h.pool.run_until_stalled();

  assert!(matches!(errs.borrow()[0], HttpError::Hook(_)));
  assert!(h.recorder.event_names().is_empty());
  assert!(h.recorder.urls().is_empty());
}

#[test]
fn before_send_runs_before_the_request_event() {
  let mut h = harness(Ok(Response::new(200, "ok")));
  let order = Rc::new(RefCell::new(vec![]));
  let c_order = order.clone();
  let api = h.service.get("/users").on_before_send(Rc::new(move |config| {
    c_order.borrow_mut().push(format!("before {}", config.url().unwrap_or_default()));
  }));

  api.send().subscribe(|_| {});
  assert_eq!(*order.borrow(), vec!["before /users"]);
  assert_eq!(h.recorder.event_names(), vec!["GET /users.REQUEST [request]"]);
  h.pool.run_until_stalled();
}

#[test]
fn shared_request_fans_out_one_transport_call() {
  let mut h = harness(Ok(Response::new(200, "pong")));
  let shared = h.service.get("/ping").send().pipe(share);

  let seen1 = Rc::new(RefCell::new(vec![]));
  let seen2 = Rc::new(RefCell::new(vec![]));
  let c_seen1 = seen1.clone();
  let c_seen2 = seen2.clone();
  let _s1 = shared.subscribe(move |v| c_seen1.borrow_mut().push(v));
  let _s2 = shared.subscribe(move |v| c_seen2.borrow_mut().push(v));
  h.pool.run_until_stalled();

  assert_eq!(h.recorder.urls().len(), 1);
  assert_eq!(*seen1.borrow(), vec![Value::String("pong".into())]);
  assert_eq!(*seen2.borrow(), vec![Value::String("pong".into())]);
}

#[test]
fn cold_send_issues_one_request_per_subscription() {
  let mut h = harness(Ok(Response::new(200, "pong")));
  let request = h.service.get("/ping").send();

  request.subscribe(|_| {});
  request.subscribe(|_| {});
  h.pool.run_until_stalled();

  assert_eq!(h.recorder.urls().len(), 2);
}

#[test]
fn unsubscribe_before_settlement_suppresses_delivery() {
  let mut h = harness(Ok(Response::new(200, "pong")));
  let request = h.service.get("/ping").send();

  let seen = Rc::new(RefCell::new(vec![]));
  let c_seen = seen.clone();
  let mut subscription = request.subscribe(move |v: Value| c_seen.borrow_mut().push(v));
  subscription.unsubscribe();
  h.pool.run_until_stalled();

  // The request itself still ran, only delivery and settlement events were
  // suppressed.
  assert_eq!(h.recorder.urls().len(), 1);
  assert!(seen.borrow().is_empty());
  assert_eq!(h.recorder.event_names(), vec!["GET /ping.REQUEST [request]"]);
}

#[test]
fn derived_services_share_nothing_but_the_template() {
  let mut h = harness(Ok(Response::new(200, "ok")));
  let base = h.service.host("https://api").header("Accept", "application/json");
  let users = base.get("/users");
  let posts = base.get("/posts");

  users.send().subscribe(|_| {});
  posts.send().subscribe(|_| {});
  h.pool.run_until_stalled();

  assert_eq!(h.recorder.urls(), vec!["https://api/users", "https://api/posts"]);
  let calls = h.recorder.calls.borrow();
  assert!(calls.iter().all(|(_, parts)| {
    parts.headers.get("Accept") == Some(&"application/json".to_string())
  }));
}
