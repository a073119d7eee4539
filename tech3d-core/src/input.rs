/// Control events produced by a UI binding and consumed by [`Scene`](crate::Scene)
use crate::animation::{Axis, Nudge, Path};
use crate::style::{ColorMode, Letter, Rgba};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    SetDepth(f32),
    SetSpacing(f32),
    SetSpeed(f32),
    SetLetterColor(Letter, Rgba),
    SetBackground(Rgba),
    SetColorMode(ColorMode),
    SetSingleColor(Rgba),
    SelectPath(Path),
    SelectAxis(Axis),
    ToggleAnimation,
    Reset,
    Nudge(Nudge),
}

impl InputEvent {
    /// Controls that are greyed out while the animation is running
    pub fn is_locked_while_animating(&self) -> bool {
        !matches!(
            self,
            InputEvent::ToggleAnimation | InputEvent::Reset | InputEvent::Nudge(_)
        )
    }

    /// False when a slider or nudge value is NaN or infinite
    pub fn has_finite_values(&self) -> bool {
        match *self {
            InputEvent::SetDepth(v) | InputEvent::SetSpacing(v) | InputEvent::SetSpeed(v) => {
                v.is_finite()
            }
            InputEvent::Nudge(Nudge::Rotate { degrees, .. }) => degrees.is_finite(),
            InputEvent::Nudge(Nudge::Translate { dx: a, dy: b })
            | InputEvent::Nudge(Nudge::SetTranslation { x: a, y: b }) => {
                a.is_finite() && b.is_finite()
            }
            InputEvent::Nudge(Nudge::Scale(delta)) => delta.is_finite(),
            _ => true,
        }
    }
}
