/// Implements [Collection](crate::model::Collection) for a record kind.
///
/// # Syntax
/// ```ignore
/// collection!("collection name" : Model = natural_key_field);
/// ```
///
/// The collection name doubles as the warehouse table name and the natural key field is used as
/// the record id in the document store.
///
/// # Example
///
/// ```ignore
/// collection!("channel" : Channel = channel_id);
///
/// assert_eq!(Channel::NAME, "channel");
/// assert_eq!(Channel::KEY, "channel_id");
/// ```
#[macro_export]
macro_rules! collection {
    ($name:literal : $model:ty = $key:ident) => {
        impl $crate::model::Collection for $model {
            const NAME: &'static str = $name;
            const KEY: &'static str = stringify!($key);

            fn key(&self) -> &str {
                &self.$key
            }
        }
    };
}
