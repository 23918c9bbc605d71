/// Build a diagnostic context map from `key => value` pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        ::std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    #[test]
    fn ctx_builds_string_map() {
        let map: BTreeMap<String, String> = ctx!("line" => 3.to_string(), "command" => "^GB");
        assert_eq!(map["line"], "3");
        assert_eq!(map["command"], "^GB");
        assert_eq!(map.len(), 2);
    }
}
