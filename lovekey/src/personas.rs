//! Persona catalogue.
//!
//! Help-reply answers in the voice of a role; super-talk rewrites a draft for
//! a recipient identity. Both are addressed by stable ids that are stored in
//! preferences and sent to the generation service.

use std::fmt;

/// Grouping shown in the role picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    Hot,
    Love,
    Flirt,
    Warm,
    Humor,
    Domineering,
    Social,
    Work,
}

impl RoleCategory {
    pub fn label(self) -> &'static str {
        match self {
            RoleCategory::Hot => "热门",
            RoleCategory::Love => "恋爱",
            RoleCategory::Flirt => "撩人",
            RoleCategory::Warm => "温暖",
            RoleCategory::Humor => "幽默",
            RoleCategory::Domineering => "霸道",
            RoleCategory::Social => "社交",
            RoleCategory::Work => "职场",
        }
    }
}

/// Which panel a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    HelpReply,
    SuperWording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RoleCategory,
    pub kind: RoleKind,
    pub hot: bool,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.id, self.description)
    }
}

const fn help(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: RoleCategory,
    hot: bool,
) -> Role {
    Role {
        id,
        name,
        description,
        category,
        kind: RoleKind::HelpReply,
        hot,
    }
}

const fn wording(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: RoleCategory,
    hot: bool,
) -> Role {
    Role {
        id,
        name,
        description,
        category,
        kind: RoleKind::SuperWording,
        hot,
    }
}

pub const HELP_REPLY_ROLES: &[Role] = &[
    help("gentle_boyfriend", "温柔男友", "温柔体贴，善解人意，总是用最温暖的话语回应你", RoleCategory::Hot, true),
    help("domineering_ceo", "霸道总裁", "霸气侧漏，宠你入骨，用霸道的方式表达深情", RoleCategory::Hot, true),
    help("humor_boy", "幽默搞笑男", "风趣幽默，总能让你开心大笑，生活充满欢乐", RoleCategory::Hot, true),
    help("flirt_master", "撩妹高手", "情话满分，撩人于无形，让她心动不已", RoleCategory::Love, true),
    help("romantic_poet", "浪漫诗人", "诗情画意，浪漫满分，用文字编织爱的诗篇", RoleCategory::Love, false),
    help("sweet_talker", "甜言蜜语", "嘴甜心暖，每句话都像蜜糖一样甜", RoleCategory::Love, false),
    help("push_pull", "推拉大师", "欲擒故纵，若即若离，让她欲罢不能", RoleCategory::Flirt, false),
    help("bad_boy", "坏坏男孩", "有点坏有点痞，但坏得让人着迷", RoleCategory::Flirt, false),
    help("warm_uncle", "温柔大叔", "成熟稳重，温柔包容，给你最安心的依靠", RoleCategory::Warm, false),
    help("sunshine_boy", "阳光男孩", "阳光开朗，积极向上，和他在一起充满正能量", RoleCategory::Warm, false),
    help("caring_boyfriend", "贴心暖男", "细心体贴，关怀备至，把你照顾得无微不至", RoleCategory::Warm, true),
    help("funny_guy", "段子手", "金句频出，笑料不断，和他聊天永远不会无聊", RoleCategory::Humor, false),
    help("witty_boy", "机智男友", "反应快，脑子活，总能给你意想不到的惊喜", RoleCategory::Humor, false),
    help("possessive_bf", "占有欲男友", "强烈的占有欲，只想把你据为己有", RoleCategory::Domineering, false),
    help("cold_outside", "高冷男神", "外表高冷，内心火热，只对你一人温柔", RoleCategory::Domineering, false),
];

pub const SUPER_WORDING_ROLES: &[Role] = &[
    wording("sw_daily_chat", "日常聊天", "轻松自然的日常对话，让聊天更有趣", RoleCategory::Hot, true),
    wording("sw_comfort", "安慰鼓励", "温暖的安慰和鼓励，给你力量和勇气", RoleCategory::Warm, true),
    wording("sw_work_reply", "工作回复", "专业得体的工作沟通，提升职场形象", RoleCategory::Work, false),
    wording("sw_refuse", "委婉拒绝", "不伤和气地拒绝，保持良好关系", RoleCategory::Social, false),
    wording("sw_apologize", "道歉求和", "真诚的道歉，化解矛盾修复关系", RoleCategory::Social, false),
    wording("sw_thanks", "感谢致意", "真挚的感谢，让对方感受到你的心意", RoleCategory::Social, false),
    wording("sw_blessing", "祝福问候", "温馨的祝福，传递美好心意", RoleCategory::Social, true),
    wording("sw_persuade", "说服技巧", "有理有据的说服，让对方心服口服", RoleCategory::Work, false),
];

/// Recipient identities for super-talk: (id, display name).
pub const IDENTITIES: &[(&str, &str)] = &[
    ("general", "通用"),
    ("boyfriend", "男朋友"),
    ("girlfriend", "女朋友"),
    ("crush", "心动对象"),
    ("wife", "妻子"),
    ("husband", "丈夫"),
    ("bestie", "闺蜜"),
    ("friend", "朋友"),
    ("boss", "上司"),
    ("client", "客户"),
    ("colleague", "同事"),
    ("family", "家人"),
];

/// One-tap replies offered by the help-reply panel before anything is typed.
pub const QUICK_REPLIES: &[&str] = &[
    "好的", "谢谢", "没问题", "稍等", "收到", "明白", "好的呢", "马上",
];

/// Ready-made lines offered by the super-talk panel.
pub const LOVE_TEMPLATES: &[&str] = &[
    "早上好，今天也要开心哦",
    "晚安，好梦",
    "我爱你，永远爱你",
    "想你了，你在干嘛",
    "吃饭了吗？记得按时吃饭",
    "天冷了，多穿点衣服",
    "工作顺利吗？加油哦",
    "今天辛苦了，好好休息",
];

/// Look a role up by id in both catalogues.
pub fn find_role(id: &str) -> Option<&'static Role> {
    HELP_REPLY_ROLES
        .iter()
        .chain(SUPER_WORDING_ROLES)
        .find(|r| r.id == id)
}

/// Display name of an identity id.
pub fn identity_name(id: &str) -> Option<&'static str> {
    IDENTITIES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, name)| *name)
}

/// Roles of one kind, optionally narrowed to a category.
pub fn roles(kind: RoleKind, category: Option<RoleCategory>) -> Vec<&'static Role> {
    let all = match kind {
        RoleKind::HelpReply => HELP_REPLY_ROLES,
        RoleKind::SuperWording => SUPER_WORDING_ROLES,
    };
    all.iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .collect()
}
