use iocraft::prelude::*;

#[derive(Default, Props)]
pub struct UploadSummaryProps {
    pub name: String,
    pub hash: String,
    pub size: u64,
    pub full_url: String,
}

#[component]
pub fn UploadSummary(props: &UploadSummaryProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: "┌ ")
                View(background_color: Color::Blue) {
                    Text(content: &props.name, color: Color::White)
                }
            }
            Text(content: format!("│ {} bytes", props.size))
            Text(content: format!("│ hash {}", props.hash))
            View(flex_direction: FlexDirection::Row) {
                Text(content: "└ ")
                Text(content: &props.full_url, color: Color::Green, weight: Weight::Bold)
            }
        }
    }
}

#[derive(Default, Props)]
pub struct ShortenSummaryProps {
    pub original: String,
    pub shortened: String,
}

#[component]
pub fn ShortenSummary(props: &ShortenSummaryProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            Text(content: format!("┌ {}", props.original))
            View(flex_direction: FlexDirection::Row) {
                Text(content: "└ ")
                Text(content: &props.shortened, color: Color::Green, weight: Weight::Bold)
            }
        }
    }
}

#[derive(Default, Props)]
pub struct PendingCallProps {
    pub title: String,
}

#[component]
pub fn PendingCall(props: &PendingCallProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Row) {
            Spinner()
            Text(content: format!(" {}", props.title))
        }
    }
}

#[derive(Default, Props)]
pub struct SpinnerProps {
    pub color: Option<Color>,
}

#[component]
pub fn Spinner(props: &SpinnerProps, mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let mut frame = hooks.use_state(|| 0usize);

    hooks.use_future(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_millis(120)).await;
            frame.set((frame.get() + 1) % 8);
        }
    });

    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];
    let current_char = spinner_chars[*frame.read()];
    let color = props.color.unwrap_or(Color::Cyan);

    element! {
        Text(content: current_char, color: color)
    }
}
