//! Qualified-name resolution for super types.

use mcodegen_core::language::package_dir;
use mcodegen_ir::IrImport;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Public top-level types of `java.lang`, visible without an import.
const JAVA_LANG: &[&str] = &[
    "AbstractMethodError",
    "Appendable",
    "ArithmeticException",
    "ArrayIndexOutOfBoundsException",
    "ArrayStoreException",
    "AssertionError",
    "AutoCloseable",
    "Boolean",
    "BootstrapMethodError",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassCastException",
    "ClassCircularityError",
    "ClassFormatError",
    "ClassLoader",
    "ClassNotFoundException",
    "ClassValue",
    "CloneNotSupportedException",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "EnumConstantNotPresentException",
    "Error",
    "Exception",
    "ExceptionInInitializerError",
    "Float",
    "FunctionalInterface",
    "IllegalAccessError",
    "IllegalAccessException",
    "IllegalArgumentException",
    "IllegalCallerException",
    "IllegalMonitorStateException",
    "IllegalStateException",
    "IllegalThreadStateException",
    "IncompatibleClassChangeError",
    "IndexOutOfBoundsException",
    "InheritableThreadLocal",
    "InstantiationError",
    "InstantiationException",
    "Integer",
    "InternalError",
    "InterruptedException",
    "Iterable",
    "LayerInstantiationException",
    "LinkageError",
    "Long",
    "MatchException",
    "Math",
    "Module",
    "ModuleLayer",
    "NegativeArraySizeException",
    "NoClassDefFoundError",
    "NoSuchFieldError",
    "NoSuchFieldException",
    "NoSuchMethodError",
    "NoSuchMethodException",
    "NullPointerException",
    "Number",
    "NumberFormatException",
    "Object",
    "OutOfMemoryError",
    "Override",
    "Package",
    "Process",
    "ProcessBuilder",
    "ProcessHandle",
    "Readable",
    "Record",
    "ReflectiveOperationException",
    "Runnable",
    "Runtime",
    "RuntimeException",
    "RuntimePermission",
    "SafeVarargs",
    "SecurityException",
    "SecurityManager",
    "Short",
    "StackOverflowError",
    "StackTraceElement",
    "StackWalker",
    "StrictMath",
    "String",
    "StringBuffer",
    "StringBuilder",
    "StringIndexOutOfBoundsException",
    "SuppressWarnings",
    "System",
    "Thread",
    "ThreadDeath",
    "ThreadGroup",
    "ThreadLocal",
    "Throwable",
    "TypeNotPresentException",
    "UnknownError",
    "UnsatisfiedLinkError",
    "UnsupportedClassVersionError",
    "UnsupportedOperationException",
    "VerifyError",
    "VirtualMachineError",
    "Void",
    "WrongThreadException",
];

/// Qualified names of every class this module has seen, declared in a parsed
/// file or found on disk under the sources directory.
#[derive(Debug, Default)]
pub struct ClassIndex {
    classes: BTreeSet<String>,
}

impl ClassIndex {
    pub fn insert(&mut self, qualified_name: impl Into<String>) {
        self.classes.insert(qualified_name.into());
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.classes.contains(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

/// Resolves type names as written in one compilation unit.
pub(crate) struct TypeResolver<'a> {
    index: &'a RefCell<ClassIndex>,
    sources_dir: &'a Path,
    package: &'a str,
    imports: &'a [IrImport],
    /// Simple name of every type declared in the unit -> qualified name.
    local: HashMap<String, String>,
}

impl<'a> TypeResolver<'a> {
    pub(crate) fn new(
        index: &'a RefCell<ClassIndex>,
        sources_dir: &'a Path,
        package: &'a str,
        imports: &'a [IrImport],
        local: HashMap<String, String>,
    ) -> Self {
        {
            let mut classes = index.borrow_mut();
            for qualified in local.values() {
                classes.insert(qualified.clone());
            }
        }
        Self {
            index,
            sources_dir,
            package,
            imports,
            local,
        }
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<String> {
        if let Some((head, rest)) = name.split_once('.') {
            // Outer.Inner through a local or imported outer class; anything
            // else is taken as already qualified.
            return Some(match self.resolve_simple(head) {
                Some(outer) => format!("{outer}.{rest}"),
                None => name.to_string(),
            });
        }
        self.resolve_simple(name)
    }

    fn resolve_simple(&self, name: &str) -> Option<String> {
        if let Some(qualified) = self.local.get(name) {
            return Some(qualified.clone());
        }

        let explicit = self
            .imports
            .iter()
            .filter(|i| !i.wildcard && !i.meta.properties.flag("static"))
            .find(|i| i.simple_name() == name);
        if let Some(import) = explicit {
            return Some(import.path.clone());
        }

        if let Some(found) = self.lookup(self.package, name) {
            return Some(found);
        }

        for import in self.imports.iter().filter(|i| i.wildcard) {
            if let Some(found) = self.lookup(&import.path, name) {
                return Some(found);
            }
        }

        JAVA_LANG
            .contains(&name)
            .then(|| format!("java.lang.{name}"))
    }

    fn lookup(&self, package: &str, name: &str) -> Option<String> {
        let qualified = if package.is_empty() {
            name.to_string()
        } else {
            format!("{package}.{name}")
        };
        if self.index.borrow().contains(&qualified) {
            return Some(qualified);
        }
        let on_disk = package_dir(self.sources_dir, package).join(format!("{name}.java"));
        if on_disk.is_file() {
            self.index.borrow_mut().insert(qualified.clone());
            return Some(qualified);
        }
        None
    }
}
