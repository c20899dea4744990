//! Reddit thread payloads and the cleaning pass that flattens them.
//!
//! The parsed payload stays a `serde_json::Value` tree; the listing and
//! child types here are borrowed views over it. Per-node fields are read
//! into the typed [`ThingData`], where every field is optional and a value
//! of the wrong JSON type counts as absent, so all defaulting happens at
//! that boundary and the traversal never probes shapes.
//!
//! Nothing here recurses on thread depth: the walk keeps an explicit stack
//! and the payload is torn down iteratively.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DELETED_AUTHOR: &str = "[deleted]";

const COMMENT_KIND: &str = "t1";
const LISTING_KIND: &str = "Listing";

/// A `{kind, data: {children}}` envelope.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a>(&'a Value);

/// One `{kind, data}` entry of a listing.
#[derive(Debug, Clone, Copy)]
pub struct ListingChild<'a>(&'a Value);

/// Union of the `t1` (comment) and `t3` (post) fields we care about.
/// `replies` is deliberately absent; it is walked through [`ListingChild`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThingData {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub selftext: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub subreddit: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub num_comments: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_utc: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub permalink: Option<String>,
}

/// `[post listing, comments listing]`. Elements past the second are dropped.
#[derive(Debug, Default)]
pub struct RawThreadPayload {
    post: Value,
    comments: Value,
}

impl RawThreadPayload {
    /// Takes the elements of an already shape-checked array.
    pub fn from_elements(elements: Vec<Value>) -> Self {
        let mut elements = elements.into_iter();
        let post = elements.next().unwrap_or_default();
        let comments = elements.next().unwrap_or_default();
        elements.for_each(dismantle);
        Self { post, comments }
    }

    pub fn post_listing(&self) -> Listing<'_> {
        Listing(&self.post)
    }

    pub fn comments_listing(&self) -> Listing<'_> {
        Listing(&self.comments)
    }
}

impl Drop for RawThreadPayload {
    fn drop(&mut self) {
        dismantle(std::mem::take(&mut self.post));
        dismantle(std::mem::take(&mut self.comments));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedPost {
    pub title: String,
    pub author: String,
    pub content: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: u64,
    pub url: String,
    pub created_utc: f64,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedComment {
    pub author: String,
    pub content: String,
    pub score: i64,
    pub depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanedThread {
    pub post: CleanedPost,
    pub comments: Vec<CleanedComment>,
}

impl<'a> Listing<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Children of `data.children`; empty for anything not shaped like a listing.
    fn children(self) -> &'a [Value] {
        self.0
            .pointer("/data/children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn is_listing(self) -> bool {
        self.0.get("kind").and_then(Value::as_str) == Some(LISTING_KIND)
    }
}

impl<'a> ListingChild<'a> {
    fn kind(self) -> Option<&'a str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    fn data(self) -> Option<ThingData> {
        self.0
            .get("data")
            .and_then(|data| ThingData::deserialize(data).ok())
    }

    /// The `replies` listing, when Reddit sent one instead of `""`.
    fn replies(self) -> Option<Listing<'a>> {
        self.0
            .pointer("/data/replies")
            .map(Listing)
            .filter(|replies| replies.is_listing())
    }
}

impl ThingData {
    fn to_post(&self) -> CleanedPost {
        CleanedPost {
            title: self.title.clone().unwrap_or_default(),
            author: self.author.clone().unwrap_or_default(),
            content: self.selftext.clone().unwrap_or_default(),
            subreddit: self.subreddit.clone().unwrap_or_default(),
            score: self.score.unwrap_or(0),
            num_comments: self.num_comments.unwrap_or(0),
            url: self.url.clone().unwrap_or_default(),
            created_utc: self.created_utc.unwrap_or(0.0),
            permalink: self.permalink.clone().unwrap_or_default(),
        }
    }

    /// `None` for comments by a removed account or with an empty body.
    fn into_comment(self, depth: usize) -> Option<CleanedComment> {
        let author = self
            .author
            .filter(|author| !author.is_empty())
            .unwrap_or_else(|| DELETED_AUTHOR.to_owned());
        let body = self.body.unwrap_or_default();

        if author == DELETED_AUTHOR || body.is_empty() {
            return None;
        }

        Some(CleanedComment {
            author,
            content: body,
            score: self.score.unwrap_or(0),
            depth,
        })
    }
}

pub fn clean_thread(payload: &RawThreadPayload) -> CleanedThread {
    let post = payload
        .post_listing()
        .children()
        .first()
        .and_then(|child| ListingChild(child).data())
        .map(|data| data.to_post())
        .unwrap_or_default();

    let comments = flatten_children(payload.comments_listing().children(), 0);

    CleanedThread { post, comments }
}

/// Flattens a `replies` node whose comments sit at `depth`.
///
/// Absent replies (Reddit's `""`) and anything that is not a `Listing`
/// yield nothing.
pub fn flatten_replies(replies: Option<Listing<'_>>, depth: usize) -> Vec<CleanedComment> {
    match replies {
        Some(listing) if listing.is_listing() => flatten_children(listing.children(), depth),
        _ => Vec::new(),
    }
}

/// Depth-first walk with an explicit stack of `(remaining siblings, depth)`
/// frames, so thread depth never turns into call-stack depth.
fn flatten_children(children: &[Value], depth: usize) -> Vec<CleanedComment> {
    let mut out = Vec::new();
    let mut stack = vec![(children.iter(), depth)];

    while let Some((siblings, depth)) = stack.last_mut() {
        let depth = *depth;
        let Some(child) = siblings.next().map(ListingChild) else {
            stack.pop();
            continue;
        };
        if child.kind() != Some(COMMENT_KIND) {
            continue;
        }

        if let Some(comment) = child.data().and_then(|data| data.into_comment(depth)) {
            out.push(comment);
        }

        if let Some(replies) = child.replies() {
            stack.push((replies.children().iter(), depth + 1));
        }
    }

    out
}

/// Drops a JSON tree without recursing on its depth.
pub(crate) fn dismantle(value: Value) {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Object(map) => pending.extend(map.into_iter().map(|(_, value)| value)),
            _ => {}
        }
    }
}

/// Deserializes `T` when the JSON value has the right shape and yields
/// `None` otherwise, instead of failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}
