//! Animations

use super::resolver::Context;
use crate::model::{Animation, AnimationSampler, ArrayKind, Channel};
use crate::pointer::Pointer;
use serde_json::{Map, Value};

pub(super) fn parse_animation(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> Animation {
    cx.check_properties(obj, pointer, &["channels", "samplers"]);

    // Channels index into this animation's own samplers.
    let samplers = match cx.required_array(obj, pointer, "samplers") {
        Some(items) => cx.each_object(items, &pointer.key("samplers"), parse_sampler),
        None => Vec::new(),
    };
    let sampler_count = samplers.len();

    let channels = match cx.required_array(obj, pointer, "channels") {
        Some(items) => cx.each_object(items, &pointer.key("channels"), |cx, channel, p| {
            parse_channel(cx, channel, p, sampler_count)
        }),
        None => Vec::new(),
    };

    Animation { channels, samplers }
}

fn parse_channel(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
    sampler_count: usize,
) -> Channel {
    cx.check_properties(obj, pointer, &["sampler", "target"]);

    let sampler = match obj.get("sampler") {
        Some(value) => cx.resolve_within(value, &pointer.key("sampler"), sampler_count),
        None => {
            cx.undefined(pointer, "sampler");
            None
        }
    };

    let mut channel = Channel {
        sampler,
        ..Default::default()
    };
    if let Some(target) = cx.required_object(obj, pointer, "target") {
        let target_pointer = pointer.key("target");
        cx.check_properties(target, &target_pointer, &["node", "path"]);
        channel.target_node = cx.index(target, &target_pointer, "node", ArrayKind::Nodes);
        channel.target_path = cx
            .required_string(target, &target_pointer, "path")
            .map(str::to_string);
    }
    channel
}

fn parse_sampler(
    cx: &mut Context<'_>,
    obj: &Map<String, Value>,
    pointer: &Pointer,
) -> AnimationSampler {
    cx.check_properties(obj, pointer, &["input", "interpolation", "output"]);
    AnimationSampler {
        input: cx.required_index(obj, pointer, "input", ArrayKind::Accessors),
        output: cx.required_index(obj, pointer, "output", ArrayKind::Accessors),
        interpolation: cx
            .string(obj, pointer, "interpolation")
            .map(str::to_string),
    }
}
