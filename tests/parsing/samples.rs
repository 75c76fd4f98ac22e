#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use gatemark::config::Config;
    use gatemark::parsing;

    fn documents(dir: &Path) -> Vec<PathBuf> {
        assert!(dir.exists(), "{} directory missing", dir.display());

        let entries = fs::read_dir(dir).expect("Failed to read directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("gm")
            {
                files.push(path);
            }
        }

        assert!(
            !files.is_empty(),
            "No .gm files found in {}",
            dir.display()
        );
        files.sort();
        files
    }

    #[test]
    fn ensure_samples_compile_cleanly() {
        let config = Config::default();
        let mut failures = Vec::new();

        for file in documents(Path::new("tests/samples/")) {
            let content = parsing::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

            let document = parsing::compile(&content, &config);
            if !document
                .diagnostics
                .is_empty()
            {
                println!(
                    "File {:?} has diagnostics: {:?}",
                    file, document.diagnostics
                );
                failures.push(file.clone());
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should compile without diagnostics, but {} files did not",
                failures.len()
            );
        }
    }

    #[test]
    fn ensure_broken_report_problems() {
        let config = Config::default();
        let mut unexpected = Vec::new();

        for file in documents(Path::new("tests/broken/")) {
            let content = parsing::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

            let document = parsing::compile(&content, &config);
            if document
                .diagnostics
                .is_empty()
            {
                println!("File {:?} compiled without complaint", file);
                unexpected.push(file.clone());
            }
        }

        if !unexpected.is_empty() {
            panic!(
                "Broken files should produce diagnostics, but {} files did not",
                unexpected.len()
            );
        }
    }

    #[test]
    fn lesson_sample_structure() {
        let file = Path::new("tests/samples/lesson.gm");
        let content = parsing::load(file).unwrap();
        let document = parsing::compile(&content, &Config::default());

        assert_eq!(document.total_problems, 2);
        assert_eq!(
            document
                .gates
                .len(),
            3
        );
        assert!(document.gates[1].nested);
        assert!(!document.gates[2].is_open());

        let html = document.html();
        assert!(html.contains("<h1>Week 1: Fractions</h1>"));
        assert!(html.contains(r#"<h2 class="explain">Explanation 1: Adding fractions</h2>"#));
        assert!(html.contains(r"\[\frac{1}{2} + \frac{1}{3} = \frac{5}{6}\]"));
        assert!(!html.contains("draft for the autumn term"));
    }

    #[test]
    fn missing_file() {
        let result = parsing::load(Path::new("tests/samples/nonexistent.gm"));
        assert!(result.is_err());
    }
}
