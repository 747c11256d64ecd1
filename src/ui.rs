use iocraft::prelude::*;

use crate::session::Reporter;

#[derive(Default, Props)]
pub struct MessageProps {
    pub message: String,
}

#[component]
pub fn ProgressMessage(props: &MessageProps) -> impl Into<AnyElement<'static>> {
    element! {
        Text(content: props.message.clone(), color: Color::Green)
    }
}

#[component]
pub fn ResultMessage(props: &MessageProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            Text(content: "Result:")
            Text(content: props.message.clone(), color: Color::Green)
        }
    }
}

#[component]
pub fn ErrorMessage(props: &MessageProps) -> impl Into<AnyElement<'static>> {
    element! {
        Text(content: props.message.clone(), color: Color::Red)
    }
}

/// Renders upload messages to stdout.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report_progress(&self, message: &str) {
        element!(ProgressMessage(message: message.to_string())).print();
    }

    fn report_result(&self, result: &str) {
        element!(ResultMessage(message: result.to_string())).print();
    }

    fn report_error(&self, message: &str) {
        element!(ErrorMessage(message: message.to_string())).print();
    }
}
