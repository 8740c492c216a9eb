use std::fmt::Debug;

/// State threaded through a graph.
///
/// Nodes either hand back a whole new state or a list of typed updates that
/// are applied in order. `#[derive(State)]` implements this trait and
/// generates the update enum.
pub trait GraphState: Clone + Debug + Send + Sync + 'static {
    type Update: Debug + Send;

    /// Apply a single update.
    fn apply(&mut self, update: Self::Update);

    /// Apply updates in sequence.
    fn apply_many<I: IntoIterator<Item = Self::Update>>(&mut self, updates: I) {
        for update in updates {
            self.apply(update);
        }
    }
}
