/// Short name of an entity type: the last path segment with generic
/// arguments and arity markers stripped.
///
/// `app::zoo::Animal` → `Animal`, `Zoo.Box<T>` → `Box`, ``List`1`` → `List`,
/// `Outer+Inner` → `Inner`.
#[must_use]
pub fn short_name(name: &str) -> &str {
    // generics may themselves contain paths, so cut them before splitting
    let base = name.find('<').map_or(name, |at| &name[..at]);
    let base = base.find('`').map_or(base, |at| &base[..at]);

    let tail = base
        .rsplit("::")
        .next()
        .unwrap_or(base)
        .rsplit(['.', '+'])
        .next()
        .unwrap_or(base);

    if tail.is_empty() { name } else { tail }
}
