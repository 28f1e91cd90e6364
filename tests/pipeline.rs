use arraw::http::{ApiRequest, HTTPResult, Transport};
use arraw::params::Params;
use arraw::{Config, Error, KindRegistry, Reddit, RequestOptions, Thing};
use futures::TryStreamExt;
use serde_json::{Value, json};
use std::fs;
use std::sync::Mutex;

// Serves canned pages keyed by path and the `after` cursor, so these tests
// exercise the whole request, objectify, and paginate pipeline without
// touching the network.
#[derive(Debug, Default)]
struct FixtureTransport {
    requests: Mutex<Vec<ApiRequest>>,
}

impl FixtureTransport {
    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn info(&self, request: &ApiRequest) -> Value {
        let children: Vec<_> = request
            .param("id")
            .unwrap_or_default()
            .split(',')
            .filter(|fullname| !fullname.ends_with("_missing"))
            .map(|fullname| {
                let (_, id) = fullname.split_once('_').unwrap();
                json!({"kind": "t3", "data": {"id": id, "name": fullname}})
            })
            .collect();
        json!({"kind": "Listing", "data": {"children": children, "after": null}})
    }
}

impl Transport for FixtureTransport {
    async fn request(&self, request: &ApiRequest) -> HTTPResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let response = match (request.path.as_str(), request.param("after")) {
            ("/r/cats/new/", None) => load_data("listing_page_1"),
            ("/r/cats/new/", Some("t3_a2")) => load_data("listing_page_2"),
            ("/api/info/", _) => self.info(request),
            ("/api/comment/", _) => load_data("reply"),
            _ => json!({"kind": "unknown_kind", "data": {}}),
        };
        Ok(response)
    }
}

fn load_data(file: &str) -> Value {
    let data = fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data");
    serde_json::from_str(&data).expect("test data is not valid JSON")
}

fn reddit() -> Reddit<FixtureTransport> {
    let config = Config::builder()
        .client_id("pipeline")
        .client_secret("pipeline")
        .user_agent("pipeline-test-please-ignore")
        .build()
        .unwrap();
    Reddit::with_transport(config, FixtureTransport::default()).unwrap()
}

#[tokio::test]
async fn it_paginates_a_listing_until_the_cursor_runs_out() {
    let reddit = reddit();
    let things: Vec<Thing> = reddit
        .listing("/r/cats/new/", Params::new())
        .limit(None)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    let titles: Vec<_> = things
        .iter()
        .filter_map(Thing::as_submission)
        .map(|submission| submission.title())
        .collect();
    assert_eq!(
        titles,
        vec!["My cat sits in bread", "Loaf mode engaged", "Cat vs. baguette"]
    );
    assert_eq!(reddit.transport().requests().len(), 2);
}

#[tokio::test]
async fn it_batches_info_lookups_and_skips_missing_things() {
    let reddit = reddit();
    let mut fullnames: Vec<String> = (0..249).map(|n| format!("t3_{n}")).collect();
    fullnames.insert(150, String::from("t3_missing"));

    let things: Vec<Thing> = reddit
        .info(Some(fullnames), None)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(things.len(), 249);
    assert_eq!(things[0].fullname(), Some("t3_0"));
    assert_eq!(things[248].fullname(), Some("t3_248"));
    assert_eq!(reddit.transport().requests().len(), 3);
}

#[tokio::test]
async fn it_replies_through_the_objector() {
    let reddit = reddit();
    let comment = reddit.reply("t3_1kqvv7b", "Nice bread").await.unwrap();
    assert_eq!(comment.map(|comment| comment.body()), Some(String::from("Nice bread")));
}

#[tokio::test]
async fn it_reports_unknown_kinds() {
    let reddit = reddit();
    let err = reddit.get("/somewhere/else/", Params::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnrecognizedKind(kind) if kind == "unknown_kind"));
}

#[tokio::test]
async fn it_objectifies_custom_kinds() {
    let config = Config::builder()
        .client_id("pipeline")
        .user_agent("pipeline-test-please-ignore")
        .build()
        .unwrap();
    let registry = KindRegistry::builder(config.kinds())
        .unwrap()
        .register("unknown_kind", |data| {
            Ok(Thing::Message(arraw::models::Message::new(data)))
        })
        .build();
    let reddit = Reddit::with_registry(config, FixtureTransport::default(), registry);

    let object = reddit
        .post("/somewhere/else/", RequestOptions::new())
        .await
        .unwrap();
    assert!(matches!(object.into_thing(), Some(Thing::Message(_))));
}
