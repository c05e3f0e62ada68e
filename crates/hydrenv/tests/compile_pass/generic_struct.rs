//! Test: generic structs and where clauses compile

use hydrenv::Hydrate;

#[derive(Default, Hydrate)]
struct Wrapper<T>
where
    T: Default,
{
    #[env(key = "NAME")]
    name: String,

    extra: T,
}

fn main() {
    let mut wrapper = Wrapper::<f32>::default();
    let _ = wrapper.apply_env();
    let _ = (wrapper.name, wrapper.extra);
}
