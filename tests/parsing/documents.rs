#[cfg(test)]
mod documents {
    use gatemark::config::Config;
    use gatemark::language::{Block, GateRef, VisibilityMode};
    use gatemark::parsing::{compile, DiagnosticKind, Severity};

    #[test]
    fn configured_labels_appear_in_headings() {
        let config = Config::parse(
            r#"
[labels]
problem = "Aufgabe"
example = "Beispiel"
            "#,
        )
        .unwrap();

        let document = compile("#eg{Eins}\n#pb{Zwei}{?}{2}", &config);
        let html = document.html();

        assert!(html.contains(r#"<h2 class="example">Beispiel 1: Eins</h2>"#));
        assert!(html.contains(r#"<h2 class="problem" data-problem-id="1">Aufgabe 1: Zwei</h2>"#));
    }

    #[test]
    fn configured_prefix_and_cooldown_are_defaults() {
        let config = Config::parse(
            r#"
[defaults]
answer_prefix = "week3::"
cooldown_ms = 4000
            "#,
        )
        .unwrap();

        let document = compile("#pb{A}{?}{a}\n#CT{0}\n#pb{B}{?}{b}", &config);

        assert_eq!(document.gates[0].prefix, "week3::");
        assert_eq!(
            document.gates[0]
                .cooldown
                .as_millis(),
            4000
        );
        assert_eq!(
            document.gates[1]
                .cooldown
                .as_millis(),
            0
        );
    }

    #[test]
    fn reveal_sections_wrap_what_follows_each_gate() {
        let document = compile(
            "intro\n#pb{A}{?}{a}\nafter a\n#wt{W}{hold}\nafter w\n#ST{show}\nfree",
            &Config::default(),
        );

        assert_eq!(
            document
                .blocks
                .len(),
            7
        );
        assert_eq!(document.blocks[3], Block::Gate(GateRef::wait(1)));
        assert_eq!(document.blocks[5], Block::Marker(VisibilityMode::Show));

        let html = document.html();
        assert!(html.contains(
            "<div id=\"reveal-after-problem-1\" class=\"revealable-section\">\n<p>after a</p>\n</div>"
        ));
        assert!(html.contains(
            "<div id=\"reveal-after-wait-1\" class=\"revealable-section\">\n<p>after w</p>\n</div>"
        ));
        assert!(html.ends_with("<p>free</p>"));
    }

    #[test]
    fn diagnostics_carry_line_and_severity() {
        let document = compile(
            "fine\n#pb{only}\n#zz{x}\n#bg{table}\n#ST{maybe}",
            &Config::default(),
        );

        let lines: Vec<usize> = document
            .diagnostics
            .iter()
            .map(|d| d.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);

        assert_eq!(
            document.diagnostics[0].kind,
            DiagnosticKind::MissingArguments {
                command: "#pb".to_string(),
                usage: "title, statement, answers"
            }
        );
        assert_eq!(document.diagnostics[0].severity(), Severity::Error);
        assert_eq!(document.diagnostics[1].severity(), Severity::Warning);
        assert_eq!(
            document.diagnostics[2].kind,
            DiagnosticKind::UnknownBlock("table".to_string())
        );
        assert_eq!(
            document.diagnostics[3].kind,
            DiagnosticKind::InvalidVisibility("maybe".to_string())
        );
    }

    #[test]
    fn unterminated_code_is_reported_at_its_start() {
        let document = compile("text\n\n#bg{code}{c}\nint x;", &Config::default());

        assert_eq!(
            document
                .diagnostics
                .len(),
            1
        );
        assert_eq!(document.diagnostics[0].line, 2);
        assert_eq!(
            document.diagnostics[0].kind,
            DiagnosticKind::UnterminatedCodeBlock
        );
        assert!(document
            .html()
            .contains(r#"<code class="language-c">int x;</code>"#));
    }

    #[test]
    fn answers_never_appear_in_plain_text() {
        let document = compile("#pb{Secret}{What?}{swordfish}", &Config::default());
        let html = document.html();

        assert!(!html.contains("swordfish"));
        assert!(html.contains("data-answers="));
    }
}
