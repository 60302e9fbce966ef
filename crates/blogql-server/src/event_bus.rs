use blogql_core::{Comment, MutationKind, Post, PostId, StoreEvent};
use blogql_store::{PostRemoval, PostUpdate, UserRemoval};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Fan-out of store changes to subscription streams.
///
/// Only published posts are announced on the post channel. Comment events
/// are routed to subscribers by the comment's parent post.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// `capacity` must be at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Never blocks, so it is safe to call with the store's write lock held.
    pub fn publish(&self, event: StoreEvent) {
        let event_type = event.event_type();
        let post_id = event.post_id().to_string();
        match self.tx.send(event) {
            Ok(receivers) => debug!(event_type, %post_id, receivers, "event published"),
            Err(_) => debug!(event_type, %post_id, "event dropped, no subscribers"),
        }
    }

    pub fn post_created(&self, post: &Post) {
        if post.published {
            self.publish_post(MutationKind::Created, post.clone());
        }
    }

    /// Publishing a draft announces it as created, unpublishing announces
    /// a deletion, and drafts stay silent.
    pub fn post_updated(&self, update: &PostUpdate) {
        let mutation = match (update.was_published, update.post.published) {
            (true, true) => MutationKind::Updated,
            (false, true) => MutationKind::Created,
            (true, false) => MutationKind::Deleted,
            (false, false) => return,
        };
        self.publish_post(mutation, update.post.clone());
    }

    pub fn post_removed(&self, removal: &PostRemoval) {
        if removal.post.published {
            self.publish_post(MutationKind::Deleted, removal.post.clone());
        }
        self.comments_removed(&removal.comments);
    }

    pub fn user_removed(&self, removal: &UserRemoval) {
        for post in removal.posts.iter().filter(|p| p.published) {
            self.publish_post(MutationKind::Deleted, post.clone());
        }
        self.comments_removed(&removal.comments);
    }

    pub fn comment_changed(&self, mutation: MutationKind, comment: &Comment) {
        self.publish(StoreEvent::Comment {
            mutation,
            comment: comment.clone(),
        });
    }

    fn comments_removed(&self, comments: &[Comment]) {
        for comment in comments {
            self.comment_changed(MutationKind::Deleted, comment);
        }
    }

    fn publish_post(&self, mutation: MutationKind, post: Post) {
        self.publish(StoreEvent::Post { mutation, post });
    }

    /// Stream of post events from now on.
    pub fn post_events(&self) -> impl Stream<Item = (MutationKind, Post)> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|msg| match skip_lagged(msg)? {
            StoreEvent::Post { mutation, post } => Some((mutation, post)),
            StoreEvent::Comment { .. } => None,
        })
    }

    /// Stream of comment events on `post_id` from now on.
    pub fn comment_events(
        &self,
        post_id: PostId,
    ) -> impl Stream<Item = (MutationKind, Comment)> + Send + 'static {
        BroadcastStream::new(self.tx.subscribe()).filter_map(move |msg| {
            let event = skip_lagged(msg)?;
            if event.post_id() != &post_id {
                return None;
            }
            match event {
                StoreEvent::Comment { mutation, comment } => Some((mutation, comment)),
                StoreEvent::Post { .. } => None,
            }
        })
    }
}

fn skip_lagged(msg: Result<StoreEvent, BroadcastStreamRecvError>) -> Option<StoreEvent> {
    match msg {
        Ok(event) => Some(event),
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            warn!(skipped = n, "subscriber lagged, dropped events");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogql_core::{CommentId, User, UserId};
    use std::time::Duration;
    use tokio::time::timeout;

    fn post(published: bool) -> Post {
        Post {
            id: PostId::new(),
            title: "t".into(),
            body: "b".into(),
            published,
            author: UserId::new(),
        }
    }

    fn comment_on(post: &Post) -> Comment {
        Comment {
            id: CommentId::new(),
            text: "c".into(),
            author: UserId::new(),
            post: post.id.clone(),
        }
    }

    async fn next<S: Stream + Unpin>(stream: &mut S) -> Option<S::Item> {
        timeout(Duration::from_millis(100), stream.next()).await.ok().flatten()
    }

    #[tokio::test]
    async fn published_post_is_announced() {
        let bus = EventBus::new(16);
        let mut events = Box::pin(bus.post_events());

        let p = post(true);
        bus.post_created(&p);

        let (kind, got) = next(&mut events).await.unwrap();
        assert_eq!(kind, MutationKind::Created);
        assert_eq!(got.id, p.id);
    }

    #[tokio::test]
    async fn draft_post_is_not_announced() {
        let bus = EventBus::new(16);
        let mut events = Box::pin(bus.post_events());

        bus.post_created(&post(false));
        assert!(next(&mut events).await.is_none());
    }

    #[tokio::test]
    async fn update_transitions() {
        let bus = EventBus::new(16);
        let mut events = Box::pin(bus.post_events());

        let cases = [
            (false, true, Some(MutationKind::Created)),
            (true, true, Some(MutationKind::Updated)),
            (true, false, Some(MutationKind::Deleted)),
            (false, false, None),
        ];
        for (was, now, expected) in cases {
            bus.post_updated(&PostUpdate {
                post: post(now),
                was_published: was,
            });
            let got = next(&mut events).await.map(|(kind, _)| kind);
            assert_eq!(got, expected, "was={was} now={now}");
        }
    }

    #[tokio::test]
    async fn comment_events_are_scoped_to_their_post() {
        let bus = EventBus::new(16);
        let watched = post(true);
        let other = post(true);
        let mut events = Box::pin(bus.comment_events(watched.id.clone()));

        bus.comment_changed(MutationKind::Created, &comment_on(&other));
        let mine = comment_on(&watched);
        bus.comment_changed(MutationKind::Created, &mine);

        let (kind, got) = next(&mut events).await.unwrap();
        assert_eq!(kind, MutationKind::Created);
        assert_eq!(got.id, mine.id);
        assert!(next(&mut events).await.is_none());
    }

    #[tokio::test]
    async fn post_removal_announces_post_and_comments() {
        let bus = EventBus::new(16);
        let p = post(true);
        let mut posts = Box::pin(bus.post_events());
        let mut comments = Box::pin(bus.comment_events(p.id.clone()));

        let c = comment_on(&p);
        bus.post_removed(&PostRemoval {
            post: p.clone(),
            comments: vec![c.clone()],
        });

        assert_eq!(next(&mut posts).await.unwrap().0, MutationKind::Deleted);
        let (kind, got) = next(&mut comments).await.unwrap();
        assert_eq!(kind, MutationKind::Deleted);
        assert_eq!(got.id, c.id);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_missed_events() {
        let bus = EventBus::new(1);
        let mut events = Box::pin(bus.post_events());

        let first = post(true);
        let second = post(true);
        bus.post_created(&first);
        bus.post_created(&second);

        let (_, got) = next(&mut events).await.unwrap();
        assert_eq!(got.id, second.id);
    }

    #[tokio::test]
    async fn user_removal_announces_published_posts_and_comments() {
        let bus = EventBus::new(16);
        let live = post(true);
        let draft = post(false);
        let elsewhere = post(true);
        let mut posts = Box::pin(bus.post_events());
        let mut on_live = Box::pin(bus.comment_events(live.id.clone()));
        let mut on_elsewhere = Box::pin(bus.comment_events(elsewhere.id.clone()));

        let cascaded = comment_on(&live);
        let authored = comment_on(&elsewhere);
        bus.user_removed(&UserRemoval {
            user: User {
                id: UserId::new(),
                name: "n".into(),
                email: "e".into(),
                age: None,
            },
            posts: vec![draft, live.clone()],
            comments: vec![cascaded.clone(), authored.clone()],
        });

        let (kind, got) = next(&mut posts).await.unwrap();
        assert_eq!(kind, MutationKind::Deleted);
        assert_eq!(got.id, live.id);
        assert!(next(&mut posts).await.is_none(), "drafts stay silent");

        let (kind, got) = next(&mut on_live).await.unwrap();
        assert_eq!((kind, got.id), (MutationKind::Deleted, cascaded.id));
        let (kind, got) = next(&mut on_elsewhere).await.unwrap();
        assert_eq!((kind, got.id), (MutationKind::Deleted, authored.id));
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let bus = EventBus::new(4);
        bus.post_created(&post(true));
    }
}
