//! Source aggregation and build ability behaviour of `BinarySpec`.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use binspec_lib::ability::{FixedProbe, ProbeError};
use binspec_lib::{BinaryError, BinaryKind, BinarySpec, BuildAbility, Language, SourceRef, SourceSet, SourceSetGroup};

/// Probe returning `outcome` and counting calls through `counter`.
fn counting_probe(
  outcome: BuildAbility,
  counter: Arc<AtomicUsize>,
) -> impl Fn(&BinarySpec) -> Result<BuildAbility, ProbeError> + Send + Sync {
  move |_: &BinarySpec| -> Result<BuildAbility, ProbeError> {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(outcome.clone())
  }
}

fn cpp_set() -> SourceRef {
  SourceSet::new("cpp", Language::Cpp)
    .with_source_dir("a.cpp")
    .with_source_dir("b.cpp")
    .into_ref()
}

fn headers_set() -> SourceRef {
  SourceSet::new("headers", Language::C).with_source_dir("x.h").into_ref()
}

#[test]
fn owned_and_borrowed_sources_are_united() {
  let counter = Arc::new(AtomicUsize::new(0));
  let probe = counting_probe(BuildAbility::not_buildable("missing toolchain X"), counter.clone());
  let mut binary = BinarySpec::new("B", BinaryKind::Executable, Arc::new(probe));

  let cpp = cpp_set();
  let test_headers = headers_set();
  let mut group = SourceSetGroup::new("B");
  group.add(cpp.clone()).unwrap();
  binary.set_binary_sources(group).unwrap();
  binary.source(test_headers.clone());

  let expected: HashSet<_> = [cpp, test_headers].into_iter().collect();
  assert_eq!(binary.all_sources(), expected);
  assert!(!binary.is_legacy_binary());

  for _ in 0..5 {
    assert_eq!(
      binary.build_ability(),
      &BuildAbility::not_buildable("missing toolchain X")
    );
  }
  assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn call_order_does_not_change_the_union() {
  let cpp = cpp_set();
  let headers = headers_set();
  let shared = SourceSet::new("shared", Language::C).into_ref();

  let group = || {
    let mut group = SourceSetGroup::new("main");
    group.add(cpp.clone()).unwrap();
    group.add(shared.clone()).unwrap();
    group
  };
  let binary = || BinarySpec::new("main", BinaryKind::Executable, Arc::new(FixedProbe::buildable()));

  let mut assigned_first = binary();
  assigned_first.set_binary_sources(group()).unwrap();
  assigned_first.source(headers.clone());
  assigned_first.source(shared.clone());

  let mut borrowed_first = binary();
  borrowed_first.source(shared.clone());
  borrowed_first.source(headers.clone());
  borrowed_first.set_binary_sources(group()).unwrap();

  assert_eq!(assigned_first.all_sources(), borrowed_first.all_sources());
  assert_eq!(assigned_first.all_sources().len(), 3);
}

#[test]
fn attaching_twice_equals_attaching_once() {
  let headers = headers_set();
  let fixed = || Arc::new(FixedProbe::buildable());

  let mut once = BinarySpec::new("once", BinaryKind::TestSuite, fixed());
  once.source(headers.clone());

  let mut twice = BinarySpec::new("twice", BinaryKind::TestSuite, fixed());
  twice.source(headers.clone());
  twice.source(headers.clone());

  assert_eq!(once.all_sources(), twice.all_sources());
}

#[test]
fn borrowed_sets_are_shared_not_copied() {
  let mut tested = SourceSetGroup::new("hello");
  let cpp = tested.create("cpp", Language::Cpp).unwrap();

  let mut suite = BinarySpec::new(
    "helloTest",
    BinaryKind::TestSuite,
    Arc::new(FixedProbe::buildable()),
  );
  suite.source(cpp.clone());

  cpp.add_source_dir("src/hello/cpp");

  let seen = suite.all_sources().into_iter().next().unwrap();
  assert!(seen.ptr_eq(&cpp));
  assert_eq!(seen.source_dirs(), vec![std::path::PathBuf::from("src/hello/cpp")]);
}

#[test]
fn second_assignment_keeps_the_original_group() {
  let mut binary = BinarySpec::new(
    "main",
    BinaryKind::Executable,
    Arc::new(FixedProbe::buildable()),
  );
  let mut original = SourceSetGroup::new("original");
  let cpp = original.add(cpp_set()).unwrap();
  binary.set_binary_sources(original).unwrap();

  let mut replacement = SourceSetGroup::new("replacement");
  replacement.add(headers_set()).unwrap();
  let err = binary.set_binary_sources(replacement).unwrap_err();

  assert!(matches!(err, BinaryError::AlreadyConfigured { .. }));
  assert_eq!(err.to_string(), "sources of binary 'main' are already configured");
  let owned = binary.binary_sources().unwrap();
  assert_eq!(owned.name(), "original");
  assert_eq!(binary.all_sources(), [cpp].into_iter().collect::<HashSet<_>>());
}

#[test]
fn overrides_win_over_the_probe() {
  let counter = Arc::new(AtomicUsize::new(0));

  let mut disabled = BinarySpec::new(
    "disabled",
    BinaryKind::Executable,
    Arc::new(counting_probe(BuildAbility::Buildable, counter.clone())),
  );
  disabled.set_buildable(false).unwrap();

  let mut enabled = BinarySpec::new(
    "enabled",
    BinaryKind::Executable,
    Arc::new(counting_probe(BuildAbility::not_buildable("wrong platform"), counter.clone())),
  );
  enabled.set_buildable(true).unwrap();

  assert_eq!(disabled.build_ability(), &BuildAbility::not_buildable("explicitly disabled"));
  assert_eq!(enabled.build_ability(), &BuildAbility::Buildable);
  assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn legacy_flag_survives_every_operation() {
  let mut binary = BinarySpec::new_legacy(
    "hello",
    BinaryKind::Executable,
    Arc::new(FixedProbe::buildable()),
  );
  assert!(binary.is_legacy_binary());

  binary.source(headers_set());
  binary.set_binary_sources(SourceSetGroup::new("hello")).unwrap();
  binary.set_buildable(false).unwrap();
  let _ = binary.build_ability();
  let _ = binary.all_sources();

  assert!(binary.is_legacy_binary());
}

#[test]
fn concurrent_first_access_probes_once() {
  let counter = Arc::new(AtomicUsize::new(0));
  let probe = {
    let counter = counter.clone();
    move |_: &BinarySpec| -> Result<BuildAbility, ProbeError> {
      counter.fetch_add(1, Ordering::SeqCst);
      thread::sleep(Duration::from_millis(50));
      Ok(BuildAbility::not_buildable("slow probe says no"))
    }
  };
  let binary = BinarySpec::new("main", BinaryKind::Executable, Arc::new(probe));

  let results: Vec<BuildAbility> = thread::scope(|scope| {
    let handles: Vec<_> = (0..8)
      .map(|_| scope.spawn(|| binary.build_ability().clone()))
      .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
  });

  assert_eq!(counter.load(Ordering::SeqCst), 1);
  assert!(results.iter().all(|r| r == &BuildAbility::not_buildable("slow probe says no")));
}

#[test]
fn probe_failure_is_an_ordinary_outcome() {
  let binary = BinarySpec::new(
    "main",
    BinaryKind::Executable,
    Arc::new(|_: &BinarySpec| -> Result<BuildAbility, ProbeError> {
      Err(ProbeError::Other("toolchain registry unreachable".to_string()))
    }),
  );

  assert_eq!(
    binary.build_ability(),
    &BuildAbility::not_buildable("probe failed: toolchain registry unreachable")
  );
  assert!(!binary.is_buildable());
}

#[test]
fn a_second_binary_can_only_borrow_owned_sets() {
  let mut owner = BinarySpec::new("owner", BinaryKind::Executable, Arc::new(FixedProbe::buildable()));
  let mut other = BinarySpec::new("other", BinaryKind::Executable, Arc::new(FixedProbe::buildable()));

  let mut group = SourceSetGroup::new("owner");
  let cpp = group.create("cpp", Language::Cpp).unwrap();
  owner.set_binary_sources(group).unwrap();
  other.source(owner.binary_sources().unwrap().get("cpp").unwrap().clone());

  assert!(owner.binary_sources().unwrap().contains(&cpp));
  assert!(other.binary_sources().is_none());
  assert_eq!(other.borrowed_sources(), &[cpp.clone()]);
  assert!(other.all_sources().contains(&cpp));
}
