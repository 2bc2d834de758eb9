// Paraphrase tables and the text-to-key fallback classifier
//
// Index 0 of every table is the canonical phrasing the analyzers emit.
// The extractor maps raw text back to a key for collaborator-injected
// messages; in-crate analyzers attach keys directly.

use super::FeedbackKey;

impl FeedbackKey {
    /// Ordered paraphrases for this key. Empty for generic keys.
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            FeedbackKey::SquatBentOver => &[
                "Keep your chest up and bend your knees as you squat",
                "Chest up - bend at the knees, not just the hips",
                "Bend your knees as you go down and keep that chest lifted",
                "Don't fold forward - chest up and let your knees bend",
            ],
            FeedbackKey::SquatBackAlignment => &[
                "Keep your back straight and chest up",
                "Maintain a straight back and lift your chest",
                "Straighten your back and keep your chest lifted",
                "Focus on keeping your back straight",
            ],
            FeedbackKey::SquatSitBack => &[
                "Bend your knees and keep your chest up - sit back into the squat",
                "Sit back into the squat and let your knees bend",
                "Push your hips back and down - chest up, knees bending",
                "Drop into the squat by sitting back, not bowing forward",
            ],
            FeedbackKey::SquatUprightChair => &[
                "Keep the upper body upright and sit back like you're in a chair",
                "Stay upright and sit back as if there's a chair behind you",
                "Keep your torso tall and sink back into an imaginary chair",
                "Upper body upright - sit your hips back like you're taking a seat",
            ],
            FeedbackKey::SquatKneeTooStraight => &[
                "Bend your knees more to go deeper into the squat",
                "Try bending your knees more for better depth",
                "Get lower by bending your knees more",
                "You need more knee bend to go deeper",
            ],
            FeedbackKey::SquatGreatDepth => &[
                "Great depth! Keep your knees aligned with your toes",
                "Excellent depth! Maintain that knee alignment",
                "Perfect depth! Keep those knees tracking over your toes",
                "Awesome! You're hitting great depth",
            ],
            FeedbackKey::SquatGoodDepth => &[
                "Good form! You're getting deep into the squat",
                "Nice depth! Keep it up",
                "Looking good! You're getting lower",
                "Good work! Keep that depth",
            ],
            FeedbackKey::SquatEncouragement => &[
                "You're doing great! Keep it up!",
                "Keep going! You've got this!",
                "Nice work! Stay strong!",
                "Looking good! Keep pushing!",
            ],
            FeedbackKey::SquatKneeAlignment => &[
                "Keep your knees aligned with your toes, don't let them cave in",
                "Push your knees out to align with your toes",
                "Don't let your knees collapse inward",
                "Keep those knees tracking over your toes",
            ],
            FeedbackKey::PushUpTooShallow => &[
                "Lower your body more to get full range of motion",
                "Go deeper - lower your body more",
                "Try to get your chest closer to the ground",
                "You need more depth - lower yourself more",
            ],
            FeedbackKey::PushUpExcellentDepth => &[
                "Excellent depth! You're going all the way down",
                "Perfect depth! Keep going that low",
                "Great! You're hitting full range of motion",
                "Awesome depth! Keep it up",
            ],
            FeedbackKey::PushUpGoodDepth => &[
                "Good depth! Keep your body straight",
                "Nice depth! Maintain that straight line",
                "Looking good! Keep that form",
                "Good work on the depth!",
            ],
            FeedbackKey::PushUpNeedDeeper => &[
                "You're doing great! Try to go a bit deeper",
                "Good form! Aim for a bit more depth",
                "Almost there! Try going a little lower",
                "Nice! See if you can get a bit deeper",
            ],
            FeedbackKey::PushUpTooShallowAlt => &[
                "Lower your body more for a complete push-up",
                "You need more depth for a full push-up",
                "Try lowering yourself more",
                "Get lower for better range of motion",
            ],
            FeedbackKey::PushUpBodyAlignment => &[
                "Keep your body in a straight line from head to toe",
                "Maintain a straight line throughout your body",
                "Keep your body aligned from head to heels",
                "Focus on keeping your body straight",
            ],
            FeedbackKey::PushUpHandPosition => &[
                "Keep your hands directly under your shoulders",
                "Position your hands under your shoulders",
                "Make sure your hands are aligned with your shoulders",
                "Your hands should be directly under your shoulders",
            ],
            FeedbackKey::PushUpElbowFlare => &[
                "Keep your elbows closer to your body, not flared out",
                "Tuck your elbows in closer to your sides",
                "Don't let your elbows flare out too much",
                "Keep those elbows close to your body",
            ],
            FeedbackKey::WallSitKneeTooBent => &[
                "Bend your knees less - aim for a 90-degree angle",
                "Straighten your knees a bit - target 90 degrees",
                "Your knees are too bent - aim for 90 degrees",
                "Adjust to a 90-degree knee angle",
            ],
            FeedbackKey::WallSitKneeTooStraight => &[
                "Bend your knees more - aim for a 90-degree angle",
                "Bend deeper - target 90 degrees",
                "You need more knee bend - aim for 90 degrees",
                "Get to a 90-degree knee angle",
            ],
            FeedbackKey::WallSitPerfectKnee => &[
                "Perfect knee angle! Keep holding",
                "Excellent! That's the right angle",
                "Perfect! Maintain that 90-degree angle",
                "Great angle! Keep holding strong",
            ],
            FeedbackKey::WallSitGoodKnee => &[
                "Good form! Keep your knees at 90 degrees",
                "Nice! Maintain that knee angle",
                "Looking good! Keep those knees at 90",
                "Good work! Stay at that angle",
            ],
            FeedbackKey::WallSitBackAlignment => &[
                "Keep your back flat against the wall and upright",
                "Press your back flat against the wall",
                "Make sure your back is flat on the wall",
                "Keep your back pressed against the wall",
            ],
            FeedbackKey::WallSitBackPressed => &[
                "Keep your back pressed flat against the wall",
                "Press that back against the wall",
                "Make sure your back stays on the wall",
                "Keep your back flat on the wall",
            ],
            FeedbackKey::WallSitHipsTooHigh => &[
                "Lower your hips - they should be at knee level or below",
                "Drop your hips down to knee level",
                "Your hips need to be lower - at knee height",
                "Get those hips down to knee level",
            ],
            FeedbackKey::WallSitHipsTooLow => &[
                "Keep your hips at knee level",
                "Raise your hips to knee level",
                "Your hips should be at knee height",
                "Adjust your hips to knee level",
            ],
            FeedbackKey::DeadliftKneeTooBent => &[
                "Keep your knees slightly bent, not too deep",
                "That's too much knee bend for an RDL - just a slight bend",
                "Don't squat it - keep only a soft bend in your knees",
                "Ease up on the knee bend, this is a hip hinge",
            ],
            FeedbackKey::DeadliftKneeTooStraight => &[
                "Bend your knees slightly for proper RDL form",
                "Soften your knees a little",
                "Add a slight knee bend - don't lock them out",
                "Unlock those knees just a bit",
            ],
            FeedbackKey::DeadliftGoodKnee => &[
                "Good knee position! Maintain that slight bend",
                "Nice soft knees - keep them right there",
                "That knee bend is spot on",
                "Good! Hold that slight bend in your knees",
            ],
            FeedbackKey::DeadliftBackRounding => &[
                "Keep your back straight - don't round your spine",
                "Flatten your back - no rounding through the spine",
                "Protect your spine - keep the back straight",
                "Your back is rounding - straighten it out",
            ],
            FeedbackKey::DeadliftBackStraighten => &[
                "Keep your back straighter - maintain neutral spine",
                "Work on a flatter back - stay neutral",
                "Straighten up through the spine a little more",
                "Keep that spine neutral as you hinge",
            ],
            FeedbackKey::DeadliftBackExcellent => &[
                "Excellent back position! Keep it straight",
                "Great flat back - hold it",
                "Perfect spine position, keep it up",
                "Your back looks great - stay tight",
            ],
            FeedbackKey::DeadliftHingeMore => &[
                "Hinge at your hips more - push your hips back",
                "Send your hips further back",
                "More hip hinge - push those hips behind you",
                "Fold at the hips and push them back",
            ],
            FeedbackKey::DeadliftVeryDeep => &[
                "You're going very deep - make sure you can maintain back position",
                "That's deep - only go as low as your back stays flat",
                "Careful with that depth - keep the back set",
                "Very deep hinge - watch your back position",
            ],
            FeedbackKey::DeadliftGoodHinge => &[
                "Good hip hinge! Keep pushing your hips back",
                "Nice hinge - hips driving back",
                "That's the hinge - keep it going",
                "Good! Keep loading those hips back",
            ],
            FeedbackKey::DeadliftShoulderPosition => &[
                "Keep your shoulders over or slightly behind the bar",
                "Pull your shoulders back over the bar",
                "Don't let your shoulders drift forward",
                "Shoulders back - stay over the bar",
            ],
            FeedbackKey::Generic(_) => &[],
        }
    }
}

/// Classify raw feedback text back to a canonical key.
///
/// Substring heuristics, most specific first; falls back to a synthesized
/// generic key from the first 20 characters. Returns `None` only for
/// empty input.
pub fn extract_feedback_key(text: &str) -> Option<FeedbackKey> {
    if text.is_empty() {
        return None;
    }

    let t = text.to_lowercase();

    if t.contains("sit back into the squat") {
        return Some(FeedbackKey::SquatSitBack);
    }
    if t.contains("like you're in a chair") || t.contains("imaginary chair") {
        return Some(FeedbackKey::SquatUprightChair);
    }
    if t.contains("chest up and bend your knees") {
        return Some(FeedbackKey::SquatBentOver);
    }
    if t.contains("back straight and chest up") {
        return Some(FeedbackKey::SquatBackAlignment);
    }

    if t.contains("round your spine") || t.contains("back is rounding") {
        return Some(FeedbackKey::DeadliftBackRounding);
    }
    if t.contains("neutral spine") {
        return Some(FeedbackKey::DeadliftBackStraighten);
    }
    if t.contains("excellent back position") {
        return Some(FeedbackKey::DeadliftBackExcellent);
    }
    if t.contains("hinge at your hips") {
        return Some(FeedbackKey::DeadliftHingeMore);
    }
    if t.contains("good hip hinge") {
        return Some(FeedbackKey::DeadliftGoodHinge);
    }
    if t.contains("very deep") {
        return Some(FeedbackKey::DeadliftVeryDeep);
    }
    if t.contains("behind the bar") || t.contains("over the bar") {
        return Some(FeedbackKey::DeadliftShoulderPosition);
    }
    if t.contains("slightly bent") {
        return Some(FeedbackKey::DeadliftKneeTooBent);
    }
    if t.contains("bend your knees slightly") || t.contains("rdl") {
        return Some(FeedbackKey::DeadliftKneeTooStraight);
    }
    if t.contains("slight bend") {
        return Some(FeedbackKey::DeadliftGoodKnee);
    }

    if t.contains("bend your knees less") {
        return Some(FeedbackKey::WallSitKneeTooBent);
    }
    if t.contains("bend your knees more") || t.contains("knee bend") {
        if t.contains("squat") {
            return Some(FeedbackKey::SquatKneeTooStraight);
        }
        if t.contains("90") || t.contains("wall") {
            return Some(FeedbackKey::WallSitKneeTooStraight);
        }
    }

    if t.contains("great depth") || t.contains("excellent depth") {
        if t.contains("toes") || t.contains("squat") {
            return Some(FeedbackKey::SquatGreatDepth);
        }
        return Some(FeedbackKey::PushUpExcellentDepth);
    }
    if t.contains("good form") || t.contains("good depth") {
        if t.contains("squat") {
            return Some(FeedbackKey::SquatGoodDepth);
        }
        if t.contains("90") || t.contains("wall") {
            return Some(FeedbackKey::WallSitGoodKnee);
        }
        return Some(FeedbackKey::PushUpGoodDepth);
    }

    if t.contains("pressed") && t.contains("wall") {
        return Some(FeedbackKey::WallSitBackPressed);
    }
    if t.contains("back flat") || t.contains("against the wall") {
        return Some(FeedbackKey::WallSitBackAlignment);
    }
    if t.contains("knees aligned") || t.contains("knees tracking") || t.contains("cave in") {
        return Some(FeedbackKey::SquatKneeAlignment);
    }

    if t.contains("full range of motion") {
        return Some(FeedbackKey::PushUpTooShallow);
    }
    if t.contains("complete push-up") || t.contains("full push-up") {
        return Some(FeedbackKey::PushUpTooShallowAlt);
    }
    if t.contains("lower your body") || t.contains("go deeper") {
        return Some(FeedbackKey::PushUpTooShallow);
    }
    if t.contains("straight line") {
        return Some(FeedbackKey::PushUpBodyAlignment);
    }
    if t.contains("hands directly under") || t.contains("hands under") {
        return Some(FeedbackKey::PushUpHandPosition);
    }
    if t.contains("elbows closer") || t.contains("flare") || t.contains("flared") {
        return Some(FeedbackKey::PushUpElbowFlare);
    }

    if t.contains("perfect knee angle") {
        return Some(FeedbackKey::WallSitPerfectKnee);
    }
    if t.contains("90-degree") || t.contains("90 degrees") {
        if t.contains("perfect") {
            return Some(FeedbackKey::WallSitPerfectKnee);
        }
        return Some(FeedbackKey::WallSitGoodKnee);
    }
    if t.contains("hips") && t.contains("lower") {
        return Some(FeedbackKey::WallSitHipsTooHigh);
    }
    if t.contains("hips") && t.contains("knee level") {
        return Some(FeedbackKey::WallSitHipsTooLow);
    }

    if t.contains("a bit deeper") {
        return Some(FeedbackKey::PushUpNeedDeeper);
    }
    if t.contains("doing great") || t.contains("keep it up") {
        return Some(FeedbackKey::SquatEncouragement);
    }

    // Unknown text: synthesize a key from its prefix. Distinct texts with
    // the same 20-character prefix collide; acceptable for the fallback.
    let prefix: String = text
        .chars()
        .take(20)
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    Some(FeedbackKey::Generic(format!("generic-{}", prefix)))
}
