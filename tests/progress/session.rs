#[cfg(test)]
mod session {
    use gatemark::config::{Config, Messages};
    use gatemark::language::{Document, GateRef};
    use gatemark::parsing::compile;
    use gatemark::progress::{MemoryStorage, Outcome, Session, SolvedAnswer, Storage};

    const LESSON: &str = "intro\n#pb{A}{One?}{1, one}\nafter a\n#pb{B}{Two?}{2}\nafter b";

    fn document(content: &str) -> Document {
        compile(content, &Config::default())
    }

    #[test]
    fn progress_survives_a_reload() {
        let document = document(LESSON);
        let messages = Messages::default();

        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");
        assert_eq!(session.check_problem_answer(1, " one "), Outcome::Correct);
        let storage = session.into_storage();

        assert!(storage
            .load("k")
            .unwrap()
            .is_some());

        let session = Session::load(&document, &messages, storage, "k");
        let snapshot = session.snapshot();

        assert_eq!(snapshot.correct_problems_count, 1);
        assert_eq!(snapshot.total_problems_count, 2);
        assert!(snapshot.is_solved(GateRef::problem(1)));
        assert!(snapshot.is_revealed(GateRef::problem(1)));
        assert_eq!(snapshot.problem_states[&1].last_answer, "one");
    }

    #[test]
    fn reloaded_progress_renders_the_same() {
        let document = document(&format!("{}\n#wt{{Break}}{{hold}}{{sesame}}\nlast", LESSON));
        let messages = Messages::default();

        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");
        assert_eq!(session.check_problem_answer(1, "1"), Outcome::Correct);
        assert_eq!(session.check_problem_answer(2, "2"), Outcome::Correct);
        assert_eq!(session.check_wait_condition(1, "sesame"), Outcome::Unlocked);
        let before = session.render();

        let reloaded = Session::load(&document, &messages, session.into_storage(), "k");

        assert_eq!(reloaded.render(), before);
        assert!(before.contains(r#"id="wait-input-1" name="wait-input-1" value="sesame" disabled>"#));
        assert!(before.contains("last"));
    }

    #[test]
    fn wrong_and_empty_answers_are_remembered_but_not_solved() {
        let document = document(LESSON);
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        assert_eq!(session.check_problem_answer(2, "   "), Outcome::Empty);
        assert_eq!(session.check_problem_answer(2, "3"), Outcome::Incorrect);

        let state = &session.snapshot().problem_states[&2];
        assert!(!state.solved);
        assert_eq!(state.last_answer, "3");
        assert_eq!(state.result_text, messages.incorrect);
        assert_eq!(session.snapshot().correct_problems_count, 0);

        assert_eq!(session.check_problem_answer(2, "2"), Outcome::Correct);
        assert_eq!(session.check_problem_answer(2, "2"), Outcome::AlreadySolved);
        assert_eq!(session.snapshot().correct_problems_count, 1);
    }

    #[test]
    fn unknown_gates_change_nothing() {
        let document = document(LESSON);
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        assert_eq!(
            session.check_problem_answer(7, "x"),
            Outcome::UnknownGate(GateRef::problem(7))
        );
        assert!(session
            .into_storage()
            .load("k")
            .unwrap()
            .is_none());
    }

    #[test]
    fn skipping_asks_then_locks_until_the_cooldown_passes() {
        let document = document(&format!("#CT{{1500}}\n{}", LESSON));
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        let mut asked = String::new();
        let outcome = session.skip_problem(1, |question| {
            asked = question.to_string();
            true
        });

        assert!(asked.starts_with(&messages.confirm_skip));
        assert!(asked.ends_with("(Skipping will be possible again after about 1 second.)"));
        assert_eq!(
            outcome,
            Outcome::Skipped {
                answer: "1".to_string(),
                cooldown: std::time::Duration::from_millis(1500)
            }
        );
        assert!(session.skip_locked());
        assert_eq!(session.snapshot().skip_count, 1);
        assert_eq!(session.snapshot().correct_problems_count, 0);

        let mut called = false;
        let outcome = session.skip_problem(2, |_| {
            called = true;
            true
        });
        assert!(!called);
        assert_eq!(outcome, Outcome::CoolingDown);

        session.cooldown_elapsed();
        session.cooldown_elapsed();
        assert!(!session.skip_locked());

        assert_eq!(session.skip_problem(2, |_| false), Outcome::Declined);
        assert!(!session
            .snapshot()
            .is_solved(GateRef::problem(2)));
    }

    #[test]
    fn skip_confirmation_counts_whole_seconds() {
        let messages = Messages::default();

        for (cooldown, expected) in [
            ("700", None),
            ("1000", Some("about 1 second.)")),
            ("1999", Some("about 1 second.)")),
            ("2500", Some("about 2 seconds.)")),
        ] {
            let document = document(&format!("#CT{{{}}}\n{}", cooldown, LESSON));
            let session = Session::load(&document, &messages, MemoryStorage::new(), "k");
            let question = session.skip_confirmation(1);

            match expected {
                Some(ending) => assert!(question.ends_with(ending), "{}: {}", cooldown, question),
                None => assert_eq!(question, messages.confirm_skip),
            }
        }
    }

    #[test]
    fn skip_cooldown_carries_over_to_the_next_session() {
        let document = document(&format!("#CT{{60000}}\n{}", LESSON));
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        session.skip_problem(1, |_| true);
        assert!(session.skip_locked());

        let mut session = Session::load(&document, &messages, session.into_storage(), "k");
        assert!(session.skip_locked());
        assert!(session
            .snapshot()
            .problem_states[&1]
            .skipped);
        assert_eq!(session.skip_problem(2, |_| true), Outcome::CoolingDown);

        session.cooldown_elapsed();
        let session = Session::load(&document, &messages, session.into_storage(), "k");
        assert!(!session.skip_locked());
    }

    #[test]
    fn spent_skip_cooldown_does_not_lock_the_next_session() {
        let document = document(&format!("#CT{{0}}\n{}", LESSON));
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        session.skip_problem(1, |_| true);

        let mut session = Session::load(&document, &messages, session.into_storage(), "k");
        assert!(!session.skip_locked());
        assert!(matches!(
            session.skip_problem(2, |_| true),
            Outcome::Skipped { .. }
        ));
    }

    #[test]
    fn visibility_follows_solved_gates() {
        let document = document(LESSON);
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        assert_eq!(session.visibility(), vec![true, true, false, false, false]);

        session.check_problem_answer(1, "1");
        assert_eq!(session.visibility(), vec![true, true, true, true, false]);

        session.check_problem_answer(2, "2");
        assert_eq!(session.visibility(), vec![true; 5]);
    }

    #[test]
    fn problems_set_to_show_do_not_gate() {
        let document = document(&format!("#ST{{problem}}{{show}}\n{}\n#wt{{W}}{{hold}}\nlast", LESSON));
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        assert_eq!(
            session.visibility(),
            vec![true, true, true, true, true, true, false]
        );

        assert_eq!(session.check_wait_condition(1, ""), Outcome::Unlocked);
        assert_eq!(session.visibility(), vec![true; 7]);
    }

    #[test]
    fn password_waits() {
        let document = document("#wt{Break}{Ask for the word}{sesame}\nlater");
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        assert_eq!(session.check_wait_condition(1, ""), Outcome::EmptyPassword);
        assert_eq!(session.check_wait_condition(1, "open"), Outcome::WrongPassword);
        assert_eq!(session.check_wait_condition(1, "sesame"), Outcome::Unlocked);
        assert_eq!(session.check_wait_condition(1, "sesame"), Outcome::AlreadySolved);
    }

    #[test]
    fn rendering_restores_inputs_and_hides_what_is_gated() {
        let document = document(LESSON);
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        session.check_problem_answer(1, "one");
        let html = session.render();

        assert!(html.contains(r#"id="problem-input-1" name="problem-input-1" value="one" disabled>"#));
        assert!(html.contains(r#"<div id="reveal-after-problem-1" class="revealable-section revealed">"#));
        assert!(html.contains("after a"));
        assert!(html.contains("Problem 2: B"));
        assert!(!html.contains("after b"));
    }

    #[test]
    fn solved_answers_are_decoded() {
        let document = document(LESSON);
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        assert!(session
            .solved_answers()
            .is_empty());

        session.check_problem_answer(1, "1");
        assert_eq!(
            session.solved_answers(),
            vec![SolvedAnswer {
                gate: GateRef::problem(1),
                answers: vec!["1".to_string(), "one".to_string()],
            }]
        );
    }

    #[test]
    fn unreadable_progress_starts_afresh() {
        let document = document(LESSON);
        let messages = Messages::default();

        let mut storage = MemoryStorage::new();
        storage
            .save("k", "{ not json")
            .unwrap();

        let session = Session::load(&document, &messages, storage, "k");
        assert_eq!(session.snapshot().correct_problems_count, 0);
        assert_eq!(session.snapshot().total_problems_count, 2);
    }

    #[test]
    fn saved_progress_for_missing_gates_is_dropped() {
        let document = document(LESSON);
        let messages = Messages::default();

        let mut storage = MemoryStorage::new();
        storage
            .save(
                "k",
                r#"{
                    "correctProblemsCount": 5,
                    "totalProblemsCount": 9,
                    "problemStates": {
                        "1": { "solved": true, "lastAnswer": "1" },
                        "9": { "solved": true, "lastAnswer": "?" }
                    },
                    "revealedSections": ["reveal-after-problem-1", "reveal-after-problem-9"]
                }"#,
            )
            .unwrap();

        let session = Session::load(&document, &messages, storage, "k");
        let snapshot = session.snapshot();

        assert_eq!(snapshot.total_problems_count, 2);
        assert_eq!(snapshot.correct_problems_count, 2);
        assert!(snapshot.is_solved(GateRef::problem(1)));
        assert!(!snapshot
            .problem_states
            .contains_key(&9));
        assert!(snapshot.is_revealed(GateRef::problem(1)));
        assert!(!snapshot.is_revealed(GateRef::problem(9)));
        assert!(snapshot.is_sidebar_visible);
    }

    #[test]
    fn clearing_forgets_everything() {
        let document = document(LESSON);
        let messages = Messages::default();
        let mut session = Session::load(&document, &messages, MemoryStorage::new(), "k");

        session.check_problem_answer(1, "1");
        assert!(!session.toggle_sidebar());
        session.clear();

        assert_eq!(session.snapshot().correct_problems_count, 0);
        assert!(session.snapshot().is_sidebar_visible);
        assert!(session
            .into_storage()
            .load("k")
            .unwrap()
            .is_none());
    }
}
