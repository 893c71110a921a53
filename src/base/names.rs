//! Well-known metadata names.
//!
//! Marker attributes and interfaces are matched by their fully qualified
//! metadata name: the marker declarations are emitted as source by this crate
//! (or live in referenced assemblies), so there is no type to refer to.

// Annotation markers
pub const COMMAND_ATTRIBUTE: &str = "Snap.Hutao.Core.Annotation.CommandAttribute";
pub const GENERATED_CONSTRUCTOR_ATTRIBUTE: &str =
    "Snap.Hutao.Core.Annotation.GeneratedConstructorAttribute";
pub const BINDABLE_CUSTOM_PROPERTY_PROVIDER_ATTRIBUTE: &str =
    "Snap.Hutao.Core.Annotation.BindableCustomPropertyProviderAttribute";
pub const DEPENDENCY_PROPERTY_ATTRIBUTE: &str =
    "Snap.Hutao.Core.Annotation.DependencyPropertyAttribute`1";
pub const FIELD_ACCESSOR_ATTRIBUTE: &str = "Snap.Hutao.Core.Annotation.FieldAccessorAttribute";

// Dependency injection
pub const SERVICE_ATTRIBUTE: &str = "Snap.Hutao.Core.DependencyInjection.Annotation.ServiceAttribute";
pub const FROM_KEYED_SERVICES_ATTRIBUTE: &str =
    "Snap.Hutao.Core.DependencyInjection.Annotation.FromKeyedServicesAttribute";
pub const HTTP_CLIENT_ATTRIBUTE: &str =
    "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient.HttpClientAttribute";
pub const PRIMARY_HTTP_MESSAGE_HANDLER_ATTRIBUTE: &str =
    "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient.PrimaryHttpMessageHandlerAttribute";
pub const HTTP_CLIENT_CONFIGURATION: &str =
    "Snap.Hutao.Core.DependencyInjection.Annotation.HttpClient.HttpClientConfiguration";

// Localization
pub const EXTENDED_ENUM_ATTRIBUTE: &str = "Snap.Hutao.Resource.Localization.ExtendedEnumAttribute";
pub const LOCALIZATION_KEY_ATTRIBUTE: &str =
    "Snap.Hutao.Resource.Localization.LocalizationKeyAttribute";

// Xaml
pub const SCOPED_PAGE: &str = "Snap.Hutao.UI.Xaml.Control.ScopedPage";
pub const PROPERTY_VALUES_PROVIDER: &str = "Snap.Hutao.UI.Xaml.Data.IPropertyValuesProvider";

// Framework types
pub const SERVICE_PROVIDER: &str = "System.IServiceProvider";
pub const HTTP_CLIENT: &str = "System.Net.Http.HttpClient";
pub const TASK: &str = "System.Threading.Tasks.Task";
pub const RECIPIENT_INTERFACE: &str = "CommunityToolkit.Mvvm.Messaging.IRecipient`1";

/// Fully qualified (`global::`) spellings used in emitted code.
pub mod global {
    pub const ARGUMENT_EXCEPTION: &str = "global::System.ArgumentException";
    pub const ARGUMENT_NULL_EXCEPTION: &str = "global::System.ArgumentNullException";
    pub const ASYNC_RELAY_COMMAND: &str = "global::CommunityToolkit.Mvvm.Input.AsyncRelayCommand";
    pub const ASYNC_RELAY_COMMAND_OPTIONS: &str =
        "global::CommunityToolkit.Mvvm.Input.AsyncRelayCommandOptions";
    pub const BINDABLE_CUSTOM_PROPERTY: &str = "global::Microsoft.UI.Xaml.Data.BindableCustomProperty";
    pub const BINDABLE_CUSTOM_PROPERTY_IMPLEMENTATION: &str =
        "global::Microsoft.UI.Xaml.Data.IBindableCustomPropertyImplementation";
    pub const CULTURE_INFO: &str = "global::System.Globalization.CultureInfo";
    pub const DEPENDENCY_OBJECT: &str = "global::Microsoft.UI.Xaml.DependencyObject";
    pub const DEPENDENCY_PROPERTY: &str = "global::Microsoft.UI.Xaml.DependencyProperty";
    pub const EDITOR_BROWSABLE: &str = "global::System.ComponentModel.EditorBrowsable";
    pub const EDITOR_BROWSABLE_STATE: &str = "global::System.ComponentModel.EditorBrowsableState";
    pub const ENUM: &str = "global::System.Enum";
    pub const HTTP_CLIENT: &str = "global::System.Net.Http.HttpClient";
    pub const I_COMPARABLE: &str = "global::System.IComparable";
    pub const I_EQUATABLE: &str = "global::System.IEquatable";
    pub const IDENTITY_CONVERTER: &str = "global::Snap.Hutao.Model.Primitive.Converter.IdentityConverter";
    pub const HTTP_CLIENT_FACTORY: &str = "global::System.Net.Http.IHttpClientFactory";
    pub const MAYBE_NULL: &str = "global::System.Diagnostics.CodeAnalysis.MaybeNull";
    pub const JSON_CONVERTER: &str = "global::System.Text.Json.Serialization.JsonConverter";
    pub const MESSENGER: &str = "global::CommunityToolkit.Mvvm.Messaging.IMessenger";
    pub const MESSENGER_EXTENSIONS: &str =
        "global::CommunityToolkit.Mvvm.Messaging.IMessengerExtensions";
    pub const NOT_NULL_IF_NOT_NULL: &str =
        "global::System.Diagnostics.CodeAnalysis.NotNullIfNotNull";
    pub const NOT_SUPPORTED_EXCEPTION: &str = "global::System.NotSupportedException";
    pub const NUMERICS: &str = "global::System.Numerics";
    pub const PROPERTY_METADATA: &str = "global::Microsoft.UI.Xaml.PropertyMetadata";
    pub const RELAY_COMMAND: &str = "global::CommunityToolkit.Mvvm.Input.RelayCommand";
    pub const RESOURCE_MANAGER: &str = "global::System.Resources.ResourceManager";
    pub const SERVICE_COLLECTION: &str =
        "global::Microsoft.Extensions.DependencyInjection.IServiceCollection";
    pub const SERVICE_PROVIDER: &str = "global::System.IServiceProvider";
    pub const SOCKETS_HTTP_HANDLER: &str = "global::System.Net.Http.SocketsHttpHandler";
    pub const STREAM: &str = "global::System.IO.Stream";
    pub const TYPE: &str = "global::System.Type";
    pub const UNSAFE: &str = "global::System.Runtime.CompilerServices.Unsafe";
    pub const UNSAFE_ACCESSOR: &str = "global::System.Runtime.CompilerServices.UnsafeAccessor";
    pub const UNSAFE_ACCESSOR_KIND: &str =
        "global::System.Runtime.CompilerServices.UnsafeAccessorKind";
}
