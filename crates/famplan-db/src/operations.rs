use anyhow::Result;
use async_trait::async_trait;

// The operations take `&mut self` and are implemented on
// the sqlite connection, so they run the same way on a
// locked `Connection` and inside an open transaction.

#[async_trait]
pub trait Query<T> {
    type Filter;
    async fn query(&mut self, filter: &Self::Filter) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Insert<T> {
    async fn insert(&mut self, item: T) -> Result<T>;
}

#[async_trait]
pub trait Update<T> {
    async fn update(&mut self, item: T) -> Result<T>;
}

#[async_trait]
pub trait Retrieve<T> {
    type Key;
    async fn retrieve(&mut self, key: Self::Key) -> Result<T>;
}

#[async_trait]
pub trait Delete<T> {
    async fn delete(&mut self, item: T) -> Result<()>;
}
