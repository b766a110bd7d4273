pub mod moka;
pub mod null;
pub mod redis;

pub use self::moka::MokaLookupCache;
pub use self::null::NullLookupCache;
pub use self::redis::RedisLookupCache;
