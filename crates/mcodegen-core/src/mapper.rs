//! IR-to-IR transformations applied before emission.

use crate::error::{Error, Result};
use mcodegen_ir::{
    IrClass, IrClassBuilder, IrClassKind, IrFieldBuilder, IrFile, IrFileBuilder, IrSuperClass,
    IrType, IrTypeKind, PropertyValue,
};
use std::collections::HashSet;

/// Maps one file to another. Closures `Fn(IrFile) -> Result<IrFile>` qualify.
pub trait GenerationMapper {
    fn map(&self, file: IrFile) -> Result<IrFile>;
}

impl<F> GenerationMapper for F
where
    F: Fn(IrFile) -> Result<IrFile>,
{
    fn map(&self, file: IrFile) -> Result<IrFile> {
        self(file)
    }
}

/// Maps a list of files to another list, e.g. one source to several outputs.
pub trait GenerationListMapper {
    fn map(&self, files: Vec<IrFile>) -> Result<Vec<IrFile>>;
}

impl<F> GenerationListMapper for F
where
    F: Fn(Vec<IrFile>) -> Result<Vec<IrFile>>,
{
    fn map(&self, files: Vec<IrFile>) -> Result<Vec<IrFile>> {
        self(files)
    }
}

/// Folds `mappers` over `file` left to right.
pub fn apply_mappers(file: IrFile, mappers: &[Box<dyn GenerationMapper>]) -> Result<IrFile> {
    mappers.iter().try_fold(file, |file, mapper| mapper.map(file))
}

pub fn apply_list_mappers(
    files: Vec<IrFile>,
    mappers: &[Box<dyn GenerationListMapper>],
) -> Result<Vec<IrFile>> {
    mappers.iter().try_fold(files, |files, mapper| mapper.map(files))
}

/// Sets a file-level property, e.g. the package of a unified file.
#[derive(Debug, Clone)]
pub struct SetFileProperty {
    key: String,
    value: PropertyValue,
}

impl SetFileProperty {
    pub fn new(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl GenerationMapper for SetFileProperty {
    fn map(&self, mut file: IrFile) -> Result<IrFile> {
        file.properties.insert(self.key.clone(), self.value.clone());
        Ok(file)
    }
}

/// Turns every top-level class into an interface of immutable properties.
///
/// Each class `Foo` becomes `{prefix}Foo` in the configured package. A base
/// class becomes a super-interface under the same naming. Callables are
/// dropped; abstract classes keep no fields. References to other converted
/// classes are renamed too.
#[derive(Debug, Clone)]
pub struct ClassesToInterfaces {
    file_name: String,
    package_property: String,
    package: String,
    prefix: String,
}

impl ClassesToInterfaces {
    /// `package_property` is the file property holding the package
    /// (`jvmPackage` for Java and Kotlin).
    pub fn new(
        file_name: impl Into<String>,
        package_property: impl Into<String>,
        package: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            package_property: package_property.into(),
            package: package.into(),
            prefix: prefix.into(),
        }
    }

    fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            format!("{}{}", self.prefix, simple)
        } else {
            format!("{}.{}{}", self.package, self.prefix, simple)
        }
    }

    fn convert_type(&self, ty: &IrType, converted: &HashSet<&str>) -> IrType {
        let mut ty = ty.clone();
        match &mut ty.kind {
            IrTypeKind::Reference { name, arguments } => {
                let simple = name.rsplit('.').next().unwrap_or(name).to_string();
                if converted.contains(simple.as_str()) {
                    *name = self.qualify(&simple);
                }
                for arg in arguments.iter_mut() {
                    *arg = self.convert_type(arg, converted);
                }
            }
            IrTypeKind::Array { element } => {
                **element = self.convert_type(element, converted);
            }
            IrTypeKind::Function {
                parameters,
                returns,
            } => {
                for p in parameters.iter_mut() {
                    *p = self.convert_type(p, converted);
                }
                **returns = self.convert_type(returns, converted);
            }
            IrTypeKind::Primitive { .. } | IrTypeKind::Generic { .. } => {}
        }
        ty
    }

    fn convert_class(&self, class: &IrClass, converted: &HashSet<&str>) -> Result<IrClass> {
        let name = format!("{}{}", self.prefix, class.name);
        let mut builder = IrClassBuilder::qualified(self.qualify(&class.name), name)
            .kind(IrClassKind::Interface)
            .visibility(class.visibility.clone());

        for super_class in class.base_classes() {
            let simple = super_class
                .name
                .rsplit('.')
                .next()
                .unwrap_or(&super_class.name);
            builder.push_super_class(IrSuperClass::new(
                self.qualify(simple),
                IrClassKind::Interface,
            ));
        }

        if class.meta.properties.flag("abstract") {
            return Ok(builder.build()?);
        }

        for field in &class.fields {
            builder.push_field(
                IrFieldBuilder::new(field.name.clone(), self.convert_type(&field.ty, converted))
                    .visibility(field.visibility.clone())
                    .mutable(false)
                    .build()?,
            );
        }
        Ok(builder.build()?)
    }
}

impl GenerationMapper for ClassesToInterfaces {
    fn map(&self, file: IrFile) -> Result<IrFile> {
        let converted: HashSet<&str> = file.classes().map(|c| c.name.as_str()).collect();
        if converted.is_empty() {
            return Err(Error::Mapper(format!(
                "`{}` has no classes to convert to interfaces",
                file.name
            )));
        }

        let mut out = IrFileBuilder::new(self.file_name.clone())
            .property(self.package_property.clone(), self.package.clone());
        for class in file.classes() {
            out.push_declaration(self.convert_class(class, &converted)?);
        }
        Ok(out.build())
    }
}
