use super::{Language, SourceError, SourceRef, SourceSet};

/// The source sets a binary owns outright.
///
/// Sets are keyed by their own name and iterate in insertion order. A group is
/// moved into its binary by
/// [`BinarySpec::set_binary_sources`](crate::binary::BinarySpec::set_binary_sources),
/// after which only shared access is possible. Groups cannot be cloned, so a
/// group has exactly one owner:
///
/// ```compile_fail
/// use binspec_lib::SourceSetGroup;
///
/// let group = SourceSetGroup::new("main");
/// let _copy = group.clone();
/// ```
#[derive(Debug)]
pub struct SourceSetGroup {
  name: String,
  sets: Vec<SourceRef>,
}

impl SourceSetGroup {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      sets: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Adds a source set, rejecting a second set with the same name.
  pub fn add(&mut self, source: impl Into<SourceRef>) -> Result<SourceRef, SourceError> {
    let source = source.into();
    if self.get(source.name()).is_some() {
      return Err(SourceError::DuplicateSourceSetName {
        group: self.name.clone(),
        name: source.name().to_string(),
      });
    }
    self.sets.push(source.clone());
    Ok(source)
  }

  /// Creates a new source set owned by this group.
  pub fn create(&mut self, name: impl Into<String>, language: Language) -> Result<SourceRef, SourceError> {
    let set = SourceSet::new(name, language).with_component(self.name.clone());
    self.add(set)
  }

  pub fn get(&self, name: &str) -> Option<&SourceRef> {
    self.sets.iter().find(|s| s.name() == name)
  }

  pub fn contains(&self, source: &SourceRef) -> bool {
    self.sets.iter().any(|s| s.ptr_eq(source))
  }

  pub fn iter(&self) -> impl Iterator<Item = &SourceRef> {
    self.sets.iter()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.sets.iter().map(|s| s.name())
  }

  pub fn len(&self) -> usize {
    self.sets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sets.is_empty()
  }
}

impl<'a> IntoIterator for &'a SourceSetGroup {
  type Item = &'a SourceRef;
  type IntoIter = std::slice::Iter<'a, SourceRef>;

  fn into_iter(self) -> Self::IntoIter {
    self.sets.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_duplicate_names() {
    let mut group = SourceSetGroup::new("hello");
    group.create("cpp", Language::Cpp).unwrap();

    let err = group.create("cpp", Language::C).unwrap_err();
    assert_eq!(
      err,
      SourceError::DuplicateSourceSetName {
        group: "hello".to_string(),
        name: "cpp".to_string(),
      }
    );
    assert_eq!(group.len(), 1);
    assert_eq!(group.get("cpp").unwrap().language(), Language::Cpp);
  }

  #[test]
  fn iterates_in_insertion_order() {
    let mut group = SourceSetGroup::new("hello");
    group.create("rc", Language::WindowsResources).unwrap();
    group.create("asm", Language::Assembler).unwrap();
    group.create("c", Language::C).unwrap();

    assert_eq!(group.names().collect::<Vec<_>>(), vec!["rc", "asm", "c"]);
  }

  #[test]
  fn created_sets_record_the_group_as_component() {
    let mut group = SourceSetGroup::new("hello");
    let cpp = group.create("cpp", Language::Cpp).unwrap();

    assert_eq!(cpp.component(), Some("hello"));
    assert!(group.contains(&cpp));
  }

  #[test]
  fn same_name_in_different_groups_is_allowed() {
    let mut first = SourceSetGroup::new("first");
    let mut second = SourceSetGroup::new("second");

    let a = first.create("cpp", Language::Cpp).unwrap();
    let b = second.create("cpp", Language::Cpp).unwrap();

    assert_ne!(a, b);
    assert!(!first.contains(&b));
  }
}
