/// End-to-end copy jobs driven through the public control surface.
use sample_jobs::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("sample:{relative}")).unwrap();
}

/// Relative path -> contents for every file under `root`.
fn tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    out
}

/// Runs a job to completion and returns every update it produced.
fn run(jobs: &SampleJobs, source: &Path, dest: &Path) -> Vec<JobUpdate> {
    let rx = jobs.events();
    let id = jobs.start_job(source, dest).unwrap();
    let mut updates = Vec::new();
    for event in rx.iter() {
        assert_eq!(event.id, id);
        let done = event.is_finished();
        updates.push(event.update);
        if done {
            break;
        }
    }
    jobs.wait();
    updates
}

fn build_library(root: &Path) {
    for rel in [
        "kick.wav",
        "Drums/Snare 01.WAV",
        "Drums/Snare 01.txt",
        "Drums/808/boom.wav",
        "Drums/808/boom.wav.asd",
        "Vox/Takes/take3.Wav",
        "Vox/lyrics.md",
        "Empty/.keep",
    ] {
        touch(root, rel);
    }
}

#[test]
fn copied_set_equals_matching_set_and_mirrors_paths() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    build_library(src.path());

    let jobs = SampleJobs::new();
    let updates = run(&jobs, src.path(), dst.path());

    let source_tree = tree(src.path());
    let expected: BTreeMap<_, _> = source_tree
        .into_iter()
        .filter(|(rel, _)| has_extension(rel, "wav"))
        .collect();
    assert_eq!(expected.len(), 4);
    assert_eq!(tree(dst.path()), expected);

    assert!(matches!(
        updates.last(),
        Some(JobUpdate::Finished(JobOutcome::Completed(JobSummary {
            found: 4,
            copied: 4,
            failed: 0
        })))
    ));
}

#[test]
fn progress_is_monotonic_then_resets() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    build_library(src.path());

    let jobs = SampleJobs::new();
    let updates = run(&jobs, src.path(), dst.path());

    let progress: Vec<u8> = updates
        .iter()
        .filter_map(|u| match u {
            JobUpdate::Progress(p) => Some(*p),
            _ => None,
        })
        .collect();
    let (reset, during) = progress.split_last().unwrap();
    assert_eq!(*reset, 0);
    assert!(during.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(during.last(), Some(&100));
    assert_eq!(during.len(), 4);
    assert_eq!(jobs.snapshot().progress, 0);
}

#[test]
fn second_run_produces_identical_tree() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    build_library(src.path());

    let jobs = SampleJobs::new();
    run(&jobs, src.path(), dst.path());
    let first = tree(dst.path());
    run(&jobs, src.path(), dst.path());
    assert_eq!(tree(dst.path()), first);
}

#[test]
fn source_files_are_left_untouched() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    build_library(src.path());
    let before = tree(src.path());

    run(&SampleJobs::new(), src.path(), dst.path());
    assert_eq!(tree(src.path()), before);
}

#[test]
fn empty_source_completes_with_no_files() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    touch(src.path(), "notes/readme.txt");

    let updates = run(&SampleJobs::new(), src.path(), dst.path());
    let logs: Vec<&str> = updates
        .iter()
        .filter_map(|u| match u {
            JobUpdate::Log(l) => Some(l.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        logs,
        vec![
            "Searching for .wav files...",
            "Found 0 sample file(s).",
            "All sample files copied successfully.",
        ]
    );
    assert!(tree(dst.path()).is_empty());
}

#[test]
fn missing_source_never_reaches_copying() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("dest");
    fs::create_dir_all(&dst).unwrap();

    let updates = run(&SampleJobs::new(), &dir.path().join("missing"), &dst);
    assert!(!updates.contains(&JobUpdate::Phase(JobPhase::Copying)));
    assert!(updates.contains(&JobUpdate::Phase(JobPhase::Failed)));
    assert!(matches!(
        updates.last(),
        Some(JobUpdate::Finished(JobOutcome::Failed(_)))
    ));
    assert!(tree(&dst).is_empty());
}

#[test]
fn custom_extension_is_honored() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    touch(src.path(), "a.aif");
    touch(src.path(), "b/c.AIF");
    touch(src.path(), "b/d.wav");

    let jobs = SampleJobs::new();
    let rx = jobs.events();
    jobs.start(JobConfig::new(src.path(), dst.path()).with_extension(".aif"))
        .unwrap();
    let first_log = rx
        .iter()
        .find_map(|e| match e.update {
            JobUpdate::Log(l) => Some(l),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_log, "Searching for .aif files...");
    for event in rx.iter() {
        if event.is_finished() {
            break;
        }
    }
    jobs.wait();

    let copied: Vec<PathBuf> = tree(dst.path()).into_keys().collect();
    assert_eq!(copied, vec![PathBuf::from("a.aif"), PathBuf::from("b/c.AIF")]);
}
