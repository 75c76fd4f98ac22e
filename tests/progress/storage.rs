#[cfg(test)]
mod storage {
    use gatemark::config::{Config, Messages};
    use gatemark::language::GateRef;
    use gatemark::parsing::compile;
    use gatemark::progress::{storage_key, FileStorage, Session, Storage};

    #[test]
    fn keys_come_from_the_page_name() {
        assert_eq!(
            storage_key("/course/week1.html", "ProgramRnyKey_"),
            "ProgramRnyKey_week1.html"
        );
        assert_eq!(storage_key("/course/", "P_"), "P_index");
        assert_eq!(storage_key("lesson.gm", ""), "lesson.gm");
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.load("key").unwrap(), None);

        storage
            .save("key", r#"{"skipCount":1}"#)
            .unwrap();
        assert_eq!(
            storage
                .load("key")
                .unwrap()
                .as_deref(),
            Some(r#"{"skipCount":1}"#)
        );
        assert!(dir
            .path()
            .join("state/key.json")
            .exists());
        assert!(!dir
            .path()
            .join("state/key.json.tmp")
            .exists());

        storage
            .remove("key")
            .unwrap();
        storage
            .remove("key")
            .unwrap();
        assert_eq!(storage.load("key").unwrap(), None);
    }

    #[test]
    fn sessions_share_progress_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let document = compile("#pb{A}{?}{yes}\nmore", &Config::default());
        let messages = Messages::default();
        let key = storage_key("lesson.gm", "ProgramRnyKey_");

        let mut first = Session::load(&document, &messages, FileStorage::new(dir.path()), &key);
        first.check_problem_answer(1, "yes");

        let second = Session::load(&document, &messages, FileStorage::new(dir.path()), &key);
        assert!(second
            .snapshot()
            .is_solved(GateRef::problem(1)));
        assert!(dir
            .path()
            .join("ProgramRnyKey_lesson.gm.json")
            .exists());
    }
}
