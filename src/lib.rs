pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    ChatClient, CheckFailure, CheckOutcome, ExistenceChecker, ListValidationCoordinator,
    LocationLookup, ResultCache, SubmitOutcome, SubmitWeatherQueryUseCase, WeatherChatService,
};

pub use connector::{
    AppConfig, GeminiChatClient, InMemoryResultCache, MockChatClient, RelayState,
    WeatherApiLookup,
};

pub use domain::{
    ChatReply, ChatTurn, DomainError, EntryValidationStatus, FieldError, FieldPath, FormRules,
    FormState, LocationEntry, LocationMatch, TemperatureUnit, ValidationErrorKind,
    ValidationKey, ValidationReport,
};
