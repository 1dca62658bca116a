pub mod channel;
pub mod subscription;

pub use channel::{ChannelReader, Observer, ReplayChannel};
pub use subscription::{ScopedSubscription, Subscription};
