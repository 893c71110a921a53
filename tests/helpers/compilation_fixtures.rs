//! Symbols and compilations the suites build on.

use once_cell::sync::Lazy;
use snapgen::base::names;
use snapgen::host::{AttributeData, Compilation, CompilationBuilder, ConstantValue, TypeSymbol};

pub const ASSEMBLY: &str = "Snap.Hutao";

pub static SERVICE_LIFETIME: Lazy<TypeSymbol> = Lazy::new(|| {
    TypeSymbol::enumeration("Microsoft.Extensions.DependencyInjection", "ServiceLifetime")
        .enum_member("Singleton", 0)
        .enum_member("Scoped", 1)
        .enum_member("Transient", 2)
        .build()
});

/// The attribute class named by `metadata_name`, e.g. `Ns.FooAttribute`.
pub fn attribute_class(metadata_name: &str) -> TypeSymbol {
    let (namespace, name) = metadata_name.rsplit_once('.').unwrap_or(("", metadata_name));
    TypeSymbol::class(namespace, name).sealed().not_partial().build()
}

pub fn marker(metadata_name: &str) -> AttributeData {
    AttributeData::new(&attribute_class(metadata_name))
}

/// A class registered as a service with `lifetime` (0 singleton, 1 scoped,
/// 2 transient).
pub fn service(name: &str, lifetime: i64) -> TypeSymbol {
    TypeSymbol::class("Snap.Hutao.Service", name)
        .attribute(
            marker(names::SERVICE_ATTRIBUTE).arg(ConstantValue::enum_value(&SERVICE_LIFETIME, lifetime)),
        )
        .build()
}

pub fn extended_enum(name: &str, members: &[&str]) -> TypeSymbol {
    members
        .iter()
        .enumerate()
        .fold(
            TypeSymbol::enumeration("Snap.Hutao.Model.Intrinsic", name)
                .attribute(marker(names::EXTENDED_ENUM_ATTRIBUTE)),
            |ty, (value, member)| ty.enum_member(member, value as i64),
        )
        .build()
}

/// One file per type, in the given order.
pub fn compilation(types: Vec<TypeSymbol>) -> Compilation {
    types
        .into_iter()
        .fold(CompilationBuilder::new(ASSEMBLY), |builder, ty| {
            let path = format!("{}.cs", ty.name);
            builder.file(&path, vec![ty])
        })
        .build()
}

pub const NEUTRAL_STRINGS: &str = r#"<root>
  <data name="Welcome"><value>Hello {0}</value><comment>Start page</comment></data>
  <data name="Title"><value>Snap Hutao</value></data>
</root>"#;

pub const CHINESE_STRINGS: &str = r#"<root>
  <data name="Welcome"><value>你好 {0}</value></data>
</root>"#;

pub const ENDPOINTS: &str = "Name,CN,OS\n\
string Root(),https://cn.example/,https://os.example/\n\
string Page(int index),https://cn.example/page/{index},\n";

pub const IDENTITY_STRUCTS: &str = r#"[
  { "Name": "AvatarId", "Documentation": "Avatar identity" },
  { "Name": "WeaponId" }
]"#;
