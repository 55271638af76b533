#[cfg(test)]
pub mod test {
    use std::fs;
    use std::path::Path;

    use crate::mapping::ConfigMapping;

    /// Build a mapping from `(section, [(key, value)])` literals.
    pub fn mapping(sections: &[(&str, &[(&str, &str)])]) -> ConfigMapping {
        let mut out = ConfigMapping::new();
        for (name, fields) in sections {
            out.ensure_section(name);
            for (key, value) in *fields {
                out.set(name, key, *value);
            }
        }
        out
    }

    /// A fully specified network section.
    pub fn network_section(dialect: &str) -> Vec<(&str, &str)> {
        vec![
            ("dialect", dialect),
            ("host", "example.com"),
            ("port", "5432"),
            ("username", "foo"),
            ("password", "bar"),
            ("database", "test"),
        ]
    }

    /// Write `content` to `dir/name`, creating `dir` if needed.
    pub fn write_config(dir: &Path, name: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn mapping_helper_builds_sections() {
        let m = mapping(&[("db.a", &[("dialect", "mysql")]), ("empty", &[])]);
        assert_eq!(m.get("db.a", "dialect"), Some("mysql"));
        assert!(m.contains_section("empty"));
    }
}
