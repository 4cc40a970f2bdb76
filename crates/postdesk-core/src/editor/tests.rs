use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::Mutex;

use super::*;
use crate::error::ApiError;
use crate::form::FieldError;

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Fetch(PostId),
    Create(PostPayload),
    Update(PostPayload),
}

/// Posts API double: records calls and replays queued failures.
#[derive(Default)]
struct FakeApi {
    stored: Option<Post>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<VecDeque<ApiError>>,
    hang: bool,
}

impl FakeApi {
    fn with_post(post: Post) -> Self {
        Self {
            stored: Some(post),
            ..Default::default()
        }
    }

    fn hanging() -> Self {
        Self {
            hang: true,
            ..Default::default()
        }
    }

    async fn fail_next(&self, err: ApiError) {
        self.failures.lock().await.push_back(err);
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().await.push(call);
        if self.hang {
            futures::future::pending::<()>().await;
        }
        match self.failures.lock().await.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostsApi for FakeApi {
    async fn fetch_post(&self, id: &PostId) -> Result<Post, ApiError> {
        self.record(Call::Fetch(id.clone())).await?;
        self.stored
            .clone()
            .filter(|p| p.id.as_ref() == Some(id))
            .ok_or_else(|| ApiError::NotFound(id.clone()))
    }

    async fn create_post(&self, post: &PostPayload) -> Result<Post, ApiError> {
        self.record(Call::Create(post.clone())).await?;
        let image_path = match &post.image {
            ImageValue::File(file) => format!("/images/{}", file.name),
            ImageValue::Stored(path) => path.clone(),
        };
        Ok(Post::persisted(
            "new-1",
            post.title.clone(),
            post.content.clone(),
            image_path,
        ))
    }

    async fn update_post(&self, post: &PostPayload) -> Result<(), ApiError> {
        self.record(Call::Update(post.clone())).await
    }
}

struct FixedRoute(Vec<ParamMap>);

impl Route for FixedRoute {
    fn param_map(&self) -> BoxStream<'static, ParamMap> {
        stream::iter(self.0.clone()).boxed()
    }
}

#[derive(Default)]
struct Navigations(Mutex<Vec<String>>);

#[async_trait]
impl Navigator for Navigations {
    async fn navigate_to(&self, path: &str) {
        self.0.lock().await.push(path.to_string());
    }
}

fn png_file() -> ImageFile {
    ImageFile::new("photo.png", Some("image/png".into()), PNG.to_vec())
}

fn stored_post() -> Post {
    Post::persisted("p1", "A title", "Body text", "/img/x.png")
}

fn editor(api: Arc<FakeApi>, params: ParamMap, nav: Arc<Navigations>) -> PostEditor {
    PostEditor::new(
        api,
        Arc::new(FixedRoute(vec![params])),
        nav,
        EditorConfig::default(),
    )
}

fn edit_params() -> ParamMap {
    ParamMap::new().with(POST_ID_PARAM, "p1")
}

#[tokio::test]
async fn test_create_flow_end_to_end() {
    let api = Arc::new(FakeApi::default());
    let nav = Arc::new(Navigations::default());
    let mut editor = editor(api.clone(), ParamMap::new(), nav.clone());
    let mut saved = editor.subscribe_saved();

    editor.init().await.unwrap();
    assert_eq!(editor.mode(), &Mode::Create);
    assert_eq!(editor.post(), Some(&Post::empty()));
    assert!(editor.form().image.is_required());

    editor.set_title("My Post");
    editor.set_content("Hello");
    assert_eq!(editor.on_image_picked(png_file()), FieldStatus::Valid);

    let outcome = editor.save().await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Saved(PostId::new("new-1")));

    assert_eq!(
        api.calls().await,
        vec![Call::Create(PostPayload {
            id: None,
            title: "My Post".into(),
            content: "Hello".into(),
            image: ImageValue::File(png_file()),
        })]
    );
    assert_eq!(*nav.0.lock().await, vec!["/".to_string()]);
    assert!(!editor.is_loading());

    let event = saved.try_recv().unwrap();
    assert_eq!(event.kind, SaveKind::Created);
    assert_eq!(event.post.id, Some(PostId::new("new-1")));
    assert_eq!(event.post.image_path, "/images/photo.png");

    // Form is reset after a confirmed save.
    assert_eq!(editor.form().value().title, "");
    assert!(editor.image_preview().is_none());
}

#[tokio::test]
async fn test_invalid_form_makes_no_call() {
    let api = Arc::new(FakeApi::default());
    let nav = Arc::new(Navigations::default());
    let mut editor = editor(api.clone(), ParamMap::new(), nav.clone());
    editor.init().await.unwrap();
    editor.on_image_picked(png_file());

    editor.set_title("Hi");
    editor.set_content("Hello");
    let outcome = editor.save().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Skipped(SkipReason::Invalid(_))));

    editor.set_title("Hi there");
    editor.set_content("");
    let outcome = editor.save().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Skipped(SkipReason::Invalid(_))));

    assert!(api.calls().await.is_empty());
    assert!(nav.0.lock().await.is_empty());
    assert!(!editor.is_loading());
}

#[tokio::test]
async fn test_create_requires_image() {
    let api = Arc::new(FakeApi::default());
    let mut editor = editor(api.clone(), ParamMap::new(), Arc::default());
    editor.init().await.unwrap();

    editor.set_title("My Post");
    editor.set_content("Hello");
    assert!(editor.form().is_invalid());
    assert_eq!(
        editor.save().await.unwrap(),
        SubmitOutcome::Skipped(SkipReason::Invalid("image is required".into()))
    );
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn test_edit_binds_fetched_post() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    let mut editor = editor(api.clone(), edit_params(), Arc::default());

    editor.init().await.unwrap();

    assert_eq!(editor.mode(), &Mode::Edit(PostId::new("p1")));
    assert!(!editor.is_loading());
    assert_eq!(
        editor.form().value(),
        PostFormValue {
            title: "A title".into(),
            content: "Body text".into(),
            image: None,
        }
    );
    assert_eq!(
        editor.image_preview(),
        Some(&ImagePreview::Stored("/img/x.png".into()))
    );
    assert!(!editor.form().image.is_required());
    assert_eq!(api.calls().await, vec![Call::Fetch(PostId::new("p1"))]);
}

#[tokio::test]
async fn test_edit_without_new_image_reuses_stored_path() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    let nav = Arc::new(Navigations::default());
    let mut editor = editor(api.clone(), edit_params(), nav.clone());
    let mut saved = editor.subscribe_saved();
    editor.init().await.unwrap();

    editor.set_content("Edited body");
    let outcome = editor.save().await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Saved(PostId::new("p1")));

    let calls = api.calls().await;
    assert_eq!(
        calls[1],
        Call::Update(PostPayload {
            id: Some(PostId::new("p1")),
            title: "A title".into(),
            content: "Edited body".into(),
            image: ImageValue::Stored("/img/x.png".into()),
        })
    );
    assert_eq!(*nav.0.lock().await, vec!["/".to_string()]);

    let event = saved.try_recv().unwrap();
    assert_eq!(event.kind, SaveKind::Updated);
    assert_eq!(event.post.image_path, "/img/x.png");
}

#[tokio::test]
async fn test_edit_with_new_image_sends_file() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    let mut editor = editor(api.clone(), edit_params(), Arc::default());
    editor.init().await.unwrap();

    editor.on_image_picked(png_file());
    editor.save().await.unwrap();

    match &api.calls().await[1] {
        Call::Update(payload) => assert_eq!(payload.image, ImageValue::File(png_file())),
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_mime_clears_preview() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    let mut editor = editor(api, edit_params(), Arc::default());
    editor.init().await.unwrap();

    let pdf = ImageFile::new("doc.png", Some("image/png".into()), b"%PDF-1.4".to_vec());
    assert_eq!(editor.on_image_picked(pdf), FieldStatus::Invalid);

    assert!(editor.image_preview().is_none());
    assert_eq!(
        editor.form().image.errors(),
        &[FieldError::InvalidMimeType { detected: None }]
    );
    assert!(matches!(
        editor.save().await.unwrap(),
        SubmitOutcome::Skipped(SkipReason::Invalid(_))
    ));
}

#[tokio::test]
async fn test_accepted_mime_sets_data_url() {
    let mut editor = editor(Arc::default(), ParamMap::new(), Arc::default());
    editor.init().await.unwrap();

    editor.on_image_picked(png_file());

    assert_eq!(
        editor.image_preview(),
        Some(&ImagePreview::DataUrl(
            "data:image/png;base64,iVBORw0KGgo=".into()
        ))
    );
    assert!(editor.form().image.is_valid());
}

#[tokio::test]
async fn test_failed_create_resets_loading_and_keeps_form() {
    let api = Arc::new(FakeApi::default());
    let nav = Arc::new(Navigations::default());
    let mut editor = editor(api.clone(), ParamMap::new(), nav.clone());
    editor.init().await.unwrap();
    editor.set_title("My Post");
    editor.set_content("Hello");
    editor.on_image_picked(png_file());

    let failure = ApiError::Status {
        status: 500,
        message: "boom".into(),
    };
    api.fail_next(failure.clone()).await;

    let err = editor.save().await.unwrap_err();
    assert_eq!(err, EditorError::Api(failure));
    assert!(!editor.is_loading());
    assert_eq!(editor.last_error(), Some(&err));
    assert_eq!(editor.form().value().title, "My Post");
    assert!(nav.0.lock().await.is_empty());

    // Retry succeeds and clears the error.
    editor.save().await.unwrap();
    assert!(editor.last_error().is_none());
    assert_eq!(nav.0.lock().await.len(), 1);
}

#[tokio::test]
async fn test_fetch_failure_is_surfaced() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    api.fail_next(ApiError::Transport("connection refused".into()))
        .await;
    let mut editor = editor(api.clone(), edit_params(), Arc::default());

    let err = editor.init().await.unwrap_err();
    assert_eq!(
        err,
        EditorError::Api(ApiError::Transport("connection refused".into()))
    );
    assert!(!editor.is_loading());
    assert!(editor.post().is_none());
    assert_eq!(editor.last_error(), Some(&err));

    editor.set_title("Something");
    editor.set_content("Else");
    assert_eq!(
        editor.save().await.unwrap(),
        SubmitOutcome::Skipped(SkipReason::NotReady)
    );

    editor.reload().await.unwrap();
    assert_eq!(editor.form().value().title, "A title");
    assert!(editor.last_error().is_none());
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    let params = ParamMap::new().with(POST_ID_PARAM, "missing");
    let mut editor = editor(api, params, Arc::default());

    assert_eq!(
        editor.init().await.unwrap_err(),
        EditorError::Api(ApiError::NotFound(PostId::new("missing")))
    );
}

#[tokio::test]
async fn test_cancel_aborts_in_flight_save() {
    let api = Arc::new(FakeApi::hanging());
    let mut editor = editor(api, ParamMap::new(), Arc::default());
    editor.init().await.unwrap();
    editor.set_title("My Post");
    editor.set_content("Hello");
    editor.on_image_picked(png_file());

    let token = editor.cancellation_token();
    let mut loading = editor.loading_changes();
    tokio::spawn(async move {
        loading.wait_for(|busy| *busy).await.ok();
        token.cancel();
    });

    assert_eq!(editor.save().await.unwrap_err(), EditorError::Cancelled);
    assert!(!editor.is_loading());
}

#[tokio::test]
async fn test_route_changes_switch_mode() {
    let api = Arc::new(FakeApi::with_post(stored_post()));
    let route = FixedRoute(vec![edit_params(), ParamMap::new()]);
    let mut editor = PostEditor::new(
        api,
        Arc::new(route),
        Arc::new(Navigations::default()),
        EditorConfig::default(),
    );

    editor.init().await.unwrap();
    assert!(matches!(editor.mode(), Mode::Edit(_)));

    assert!(editor.next_route_change().await.unwrap());
    assert_eq!(editor.mode(), &Mode::Create);
    assert_eq!(editor.form().value().title, "");
    assert!(editor.image_preview().is_none());

    assert!(!editor.next_route_change().await.unwrap());
}

#[tokio::test]
async fn test_empty_route_is_an_error() {
    let mut editor = PostEditor::new(
        Arc::new(FakeApi::default()),
        Arc::new(FixedRoute(Vec::new())),
        Arc::new(Navigations::default()),
        EditorConfig::default(),
    );

    assert!(matches!(
        editor.init().await.unwrap_err(),
        EditorError::Route(_)
    ));
}
