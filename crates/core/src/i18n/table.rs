//! Translation table: `(key, [english, hindi, marathi])`.

pub(super) type Entry = (&'static str, [&'static str; 3]);

#[rustfmt::skip]
pub(super) const ENTRIES: &[Entry] = &[
    // Header and footer
    ("header.subtitle", ["Sustainable Farming Solutions", "सतत खेती समाधान", "शाश्वत शेती उपाय"]),
    ("header.language", ["Language", "भाषा", "भाषा"]),
    ("header.logout", ["Logout", "लॉग आउट", "लॉग आउट"]),
    ("header.resetApp", ["Reset App", "ऐप रीसेट करें", "ॲप रीसेट करा"]),
    ("header.resetConfirm", [
        "Are you sure? This will delete all local data and restart the app.",
        "क्या आप सुनिश्चित हैं? यह सभी स्थानीय डेटा को हटा देगा और ऐप को पुनरारंभ करेगा।",
        "तुम्हाला खात्री आहे का? हे सर्व स्थानिक डेटा हटवेल आणि ॲप रीस्टार्ट करेल.",
    ]),
    ("footer.text", [
        "Sheti Man AI. Promoting Sustainable Agriculture.",
        "खेती मैन एआई। सतत कृषि को बढ़ावा देना।",
        "शेती मॅन एआय. शाश्वत शेतीला प्रोत्साहन.",
    ]),

    // Dashboard
    ("dashboard.welcome", ["Welcome to Sheti Man", "खेती मैन में आपका स्वागत है", "शेती मॅन मध्ये आपले स्वागत आहे"]),
    ("dashboard.subheading", [
        "Your intelligent assistant for organic and sustainable agriculture.",
        "जैविक और टिकाऊ कृषि के लिए आपका बुद्धिमान सहायक।",
        "सेंद्रिय आणि शाश्वत शेतीसाठी तुमचा बुद्धिमान सहाय्यक.",
    ]),
    ("dashboard.cards.recommendation.title", ["Fertilizer", "उर्वरक", "खत"]),
    ("dashboard.cards.recommendation.description", ["AI Recommendations", "एआई सलाह", "एआय सल्ला"]),
    ("dashboard.cards.cropDoctor.title", ["Disease Scan", "रोग स्कैन", "रोग स्कॅन"]),
    ("dashboard.cards.cropDoctor.description", ["Identify Problems", "समस्याएं पहचानें", "समस्या ओळखा"]),
    ("dashboard.cards.farmTasks.title", ["Tasks", "कार्य", "कामे"]),
    ("dashboard.cards.farmTasks.description", ["Manage Farm", "खेती प्रबंधन", "शेती व्यवस्थापन"]),
    ("dashboard.cards.calculator.title", ["Calculator", "कैलकुलेटर", "कॅल्क्युलेटर"]),
    ("dashboard.cards.calculator.description", ["Estimate Dosage", "खुराक अनुमान", "डोस अंदाज"]),
    ("dashboard.cards.chatbot.title", ["Ask Expert", "विशेषज्ञ से पूछें", "तज्ञांना विचारा"]),
    ("dashboard.cards.chatbot.description", ["Chat with AI", "एआई के साथ चैट", "एआय सह चॅट"]),

    // Farm tasks
    ("farmTasksPage.title", ["Farm Tasks", "कृषि कार्य", "शेतीची कामे"]),
    ("farmTasksPage.addTaskPlaceholder", ["Add a new task...", "नया कार्य जोड़ें...", "नवीन काम जोडा..."]),
    ("farmTasksPage.dueDateLabel", ["Due Date", "नियत तारीख", "पूर्ण करण्याची तारीख"]),
    ("farmTasksPage.addButton", ["Add", "जोड़ें", "जोडा"]),
    ("farmTasksPage.addNote", ["Add Note", "नोट जोड़ें", "नोंद जोडा"]),
    ("farmTasksPage.noTasks", [
        "No tasks found. Add one to get started!",
        "कोई कार्य नहीं मिला। शुरू करने के लिए एक जोड़ें!",
        "कोणतीही कामे आढळली नाहीत. सुरू करण्यासाठी एक जोडा!",
    ]),
    ("farmTasksPage.overdue", ["Overdue", "विलंबित", "उशीर झाला"]),

    // Weather
    ("weather.title", ["Local Weather", "स्थानीय मौसम", "स्थानिक हवामान"]),
    ("weather.deniedError", ["Location access denied.", "स्थान पहुंच अस्वीकृत।", "स्थान प्रवेश नाकारला."]),
    ("weather.allowRetry", ["Retry", "पुनः प्रयास करें", "पुन्हा प्रयत्न करा"]),
    ("weather.temp", ["Temp", "तापमान", "तापमान"]),
    ("weather.humidity", ["Humid", "नमी", "आर्द्रता"]),
    ("weather.wind", ["Wind", "हवा", "वारा"]),
    ("weather.tip", ["AI Tip", "एआई टिप", "एआय टीप"]),

    // Chat
    ("chatbot.title", ["Sheti Man Chat", "खेती मैन चैट", "शेती मॅन चॅट"]),
    ("chatbot.subtitle", ["Organic Expert", "जैविक विशेषज्ञ", "सेंद्रिय तज्ञ"]),
    ("chatbot.greeting", [
        "Hello! I am Sheti Man. How can I help you today?",
        "नमस्ते! मैं खेती मैन हूँ। आज मैं आपकी कैसे मदद कर सकता हूँ?",
        "नमस्कार! मी शेती मॅन आहे. मी आज तुम्हाला कशी मदत करू शकतो?",
    ]),
    ("chatbot.placeholder", ["Ask about farming...", "खेती के बारे में पूछें...", "शेतीबद्दल विचारा..."]),

    // Login
    ("loginPage.title", ["Welcome to Sheti Man", "खेती मैन में आपका स्वागत है", "शेती मॅन मध्ये आपले स्वागत आहे"]),
    ("loginPage.subtitle", ["Sign in to continue", "जारी रखने के लिए साइन इन करें", "सुरू ठेवण्यासाठी साइन इन करा"]),
    ("loginPage.loginButton", ["Sign In with Google", "Google के साथ साइन इन करें", "Google सह साइन इन करा"]),

    // Fertilizer recommendation
    ("recommendationForm.title", ["Organic Fertilizer Advisor", "जैविक उर्वरक सलाहकार", "सेंद्रिय खत सल्लागार"]),
    ("recommendationForm.cropNameLabel", ["Crop Name", "फसल का नाम", "पिकाचे नाव"]),
    ("recommendationForm.soilPhLabel", ["Soil pH", "मिट्टी का pH", "मातीचा pH"]),
    ("recommendationForm.soilMoistureLabel", ["Soil Moisture (%)", "मिट्टी की नमी (%)", "मातीतील ओलावा (%)"]),
    ("recommendationForm.climateLabel", ["Climate", "जलवायु", "हवामान"]),
    ("recommendationForm.climatePlaceholder", [
        "e.g. hot and humid, monsoon",
        "जैसे गर्म और नम, मानसून",
        "उदा. उष्ण आणि दमट, पावसाळा",
    ]),
    ("recommendationForm.npkLabel", ["Soil NPK Levels", "मिट्टी में NPK स्तर", "मातीतील NPK पातळी"]),
    ("recommendationForm.submitButton", ["Get Recommendation", "सलाह प्राप्त करें", "सल्ला मिळवा"]),
    ("recommendationForm.submittingButton", ["Analyzing...", "विश्लेषण हो रहा है...", "विश्लेषण सुरू आहे..."]),
    ("recommendationForm.resultTitle", ["Recommendation", "सलाह", "सल्ला"]),
    ("recommendationForm.placeholder", [
        "Fill in the details to get an organic fertilizer plan.",
        "जैविक उर्वरक योजना पाने के लिए विवरण भरें।",
        "सेंद्रिय खत योजना मिळवण्यासाठी तपशील भरा.",
    ]),

    // Crop doctor
    ("cropDoctor.title", ["Crop Doctor", "फसल डॉक्टर", "पीक डॉक्टर"]),
    ("cropDoctor.uploadPrompt", ["Upload a photo of your crop", "अपनी फसल की फोटो अपलोड करें", "तुमच्या पिकाचा फोटो अपलोड करा"]),
    ("cropDoctor.uploadHint", ["PNG or JPG, up to 8 MB", "PNG या JPG, 8 MB तक", "PNG किंवा JPG, 8 MB पर्यंत"]),
    ("cropDoctor.promptPlaceholder", [
        "Describe what you see (optional)",
        "आप जो देख रहे हैं उसका वर्णन करें (वैकल्पिक)",
        "तुम्हाला काय दिसते ते सांगा (ऐच्छिक)",
    ]),
    ("cropDoctor.submitButton", ["Diagnose", "जांच करें", "तपासणी करा"]),
    ("cropDoctor.resultTitle", ["Diagnosis", "निदान", "निदान"]),
    ("cropDoctor.placeholder", [
        "Upload an image to get a diagnosis.",
        "निदान के लिए एक तस्वीर अपलोड करें।",
        "निदानासाठी एक फोटो अपलोड करा.",
    ]),
    ("soilAnalyzer.title", ["Soil Analyzer", "मिट्टी विश्लेषक", "माती विश्लेषक"]),

    // Calculator
    ("calculator.title", ["Fertilizer Calculator", "उर्वरक कैलकुलेटर", "खत कॅल्क्युलेटर"]),
    ("calculator.landSizeLabel", ["Land Size (acres)", "भूमि का आकार (एकड़)", "जमिनीचे क्षेत्र (एकर)"]),
    ("calculator.cropTypeLabel", ["Crop Type", "फसल का प्रकार", "पिकाचा प्रकार"]),
    ("calculator.fertilizerTypeLabel", ["Fertilizer Type", "उर्वरक का प्रकार", "खताचा प्रकार"]),
    ("calculator.fertilizerTypePlaceholder", [
        "e.g. vermicompost, neem cake",
        "जैसे वर्मीकम्पोस्ट, नीम खली",
        "उदा. गांडूळ खत, निंबोळी पेंड",
    ]),
    ("calculator.submitButton", ["Calculate", "गणना करें", "गणना करा"]),
    ("calculator.resultTitle", ["Calculation", "गणना", "गणना"]),
    ("calculator.placeholder", [
        "Enter your field details to estimate the dosage.",
        "खुराक का अनुमान लगाने के लिए अपने खेत का विवरण दर्ज करें।",
        "डोसचा अंदाज घेण्यासाठी तुमच्या शेताचा तपशील भरा.",
    ]),

    // Store and cart
    ("store.title", ["Organic Store", "जैविक स्टोर", "सेंद्रिय दुकान"]),
    ("store.addToCart", ["Add to Cart", "कार्ट में डालें", "कार्टमध्ये टाका"]),
    ("store.supplierLabel", ["Sold by", "विक्रेता", "विक्रेता"]),
    ("cart.title", ["Your Cart", "आपका कार्ट", "तुमची कार्ट"]),
    ("cart.empty", ["Your cart is empty", "आपका कार्ट खाली है", "तुमची कार्ट रिकामी आहे"]),
    ("cart.emptyHint", [
        "Browse the store to add organic products.",
        "जैविक उत्पाद जोड़ने के लिए स्टोर देखें।",
        "सेंद्रिय उत्पादने जोडण्यासाठी दुकान पहा.",
    ]),
    ("cart.each", ["each", "प्रति नग", "प्रत्येकी"]),
    ("cart.remove", ["Remove", "हटाएं", "काढा"]),
    ("cart.total", ["Total", "कुल", "एकूण"]),
    ("cart.checkout", ["Proceed to Checkout", "चेकआउट करें", "चेकआउट करा"]),

    // Checkout
    ("checkoutPage.title", ["Checkout", "चेकआउट", "चेकआउट"]),
    ("checkoutPage.shippingTitle", ["Shipping Details", "शिपिंग विवरण", "पाठवण्याचा तपशील"]),
    ("checkoutPage.fullNameLabel", ["Full Name", "पूरा नाम", "पूर्ण नाव"]),
    ("checkoutPage.addressLabel", ["Address", "पता", "पत्ता"]),
    ("checkoutPage.cityLabel", ["City", "शहर", "शहर"]),
    ("checkoutPage.pincodeLabel", ["Pincode", "पिनकोड", "पिनकोड"]),
    ("checkoutPage.placeOrderButton", ["Place Order", "ऑर्डर करें", "ऑर्डर द्या"]),
    ("checkoutPage.summaryTitle", ["Order Summary", "ऑर्डर सारांश", "ऑर्डर सारांश"]),
    ("checkoutPage.cartEmpty", ["Your cart is empty.", "आपका कार्ट खाली है।", "तुमची कार्ट रिकामी आहे."]),
    ("checkoutPage.orderPlacedSuccess", ["Order Placed!", "ऑर्डर हो गया!", "ऑर्डर दिली!"]),
    ("checkoutPage.orderPlacedDescription", [
        "Thank you! Your organic supplies are on their way.",
        "धन्यवाद! आपकी जैविक सामग्री रास्ते में है।",
        "धन्यवाद! तुमचे सेंद्रिय साहित्य लवकरच पोहोचेल.",
    ]),
    ("checkoutPage.backToDashboardButton", ["Back to Dashboard", "डैशबोर्ड पर लौटें", "डॅशबोर्डवर परत जा"]),

    // Order history
    ("orderHistoryPage.title", ["Order History", "ऑर्डर इतिहास", "ऑर्डर इतिहास"]),
    ("orderHistoryPage.noOrders", [
        "You have not placed any orders yet.",
        "आपने अभी तक कोई ऑर्डर नहीं दिया है।",
        "तुम्ही अद्याप कोणतीही ऑर्डर दिलेली नाही.",
    ]),
    ("orderHistoryPage.orderId", ["Order ID", "ऑर्डर आईडी", "ऑर्डर आयडी"]),
    ("orderHistoryPage.date", ["Date", "तारीख", "तारीख"]),
    ("orderHistoryPage.total", ["Total", "कुल", "एकूण"]),
    ("orderHistoryPage.status", ["Status", "स्थिति", "स्थिती"]),
    ("orderHistoryPage.items", ["Items", "सामान", "वस्तू"]),
    ("orderStatus.Pending", ["Pending", "लंबित", "प्रलंबित"]),
    ("orderStatus.Shipped", ["Shipped", "भेजा गया", "पाठवले"]),
    ("orderStatus.Delivered", ["Delivered", "पहुंचा दिया गया", "पोहोचवले"]),

    // Supplier dashboard
    ("supplierDashboard.title", ["Supplier Dashboard", "आपूर्तिकर्ता डैशबोर्ड", "पुरवठादार डॅशबोर्ड"]),
    ("supplierDashboard.welcome", ["Welcome back", "फिर से स्वागत है", "पुन्हा स्वागत आहे"]),
    ("supplierDashboard.productName", ["Product Name", "उत्पाद का नाम", "उत्पादनाचे नाव"]),
    ("supplierDashboard.productDescription", ["Description", "विवरण", "वर्णन"]),
    ("supplierDashboard.productPrice", ["Price (₹)", "मूल्य (₹)", "किंमत (₹)"]),
    ("supplierDashboard.productImage", ["Product Image", "उत्पाद की तस्वीर", "उत्पादनाचा फोटो"]),
    ("supplierDashboard.uploadPrompt", ["Upload an image", "एक तस्वीर अपलोड करें", "एक फोटो अपलोड करा"]),
    ("supplierDashboard.editProductTitle", ["Edit Product", "उत्पाद संपादित करें", "उत्पादन संपादित करा"]),
    ("supplierDashboard.saveChanges", ["Save Changes", "बदलाव सहेजें", "बदल जतन करा"]),

    // Share
    ("qrCodeModal.title", ["Share Sheti Man", "खेती मैन साझा करें", "शेती मॅन शेअर करा"]),
    ("qrCodeModal.instruction", [
        "Scan this code to open the app on another phone.",
        "दूसरे फोन पर ऐप खोलने के लिए यह कोड स्कैन करें।",
        "दुसऱ्या फोनवर ॲप उघडण्यासाठी हा कोड स्कॅन करा.",
    ]),

    // Server messages
    ("errors.serviceLimit", [
        "⚠️ **Service Limit Reached**: My organic wisdom channels are currently full. I am switching to a backup line. Please tap **Try Again** in 5 seconds.",
        "⚠️ **सेवा सीमा पूरी हुई**: मेरे जैविक ज्ञान के चैनल अभी भरे हुए हैं। मैं बैकअप लाइन पर जा रहा हूँ। कृपया 5 सेकंड बाद **फिर से कोशिश करें** दबाएं।",
        "⚠️ **सेवा मर्यादा पूर्ण**: माझ्या सेंद्रिय ज्ञानाच्या वाहिन्या सध्या भरलेल्या आहेत. मी बॅकअप लाइनवर जात आहे. कृपया 5 सेकंदांनी **पुन्हा प्रयत्न करा** दाबा.",
    ]),
    ("errors.connection", [
        "⚠️ **Connection Error**: I couldn't reach the knowledge base. Please try again.",
        "⚠️ **कनेक्शन त्रुटि**: मैं ज्ञान भंडार तक नहीं पहुँच सका। कृपया फिर से प्रयास करें।",
        "⚠️ **जोडणी त्रुटी**: मी ज्ञान भांडारापर्यंत पोहोचू शकलो नाही. कृपया पुन्हा प्रयत्न करा.",
    ]),
    ("errors.apiKey", [
        "The AI service is not configured correctly. Please contact support.",
        "एआई सेवा सही तरीके से कॉन्फ़िगर नहीं है। कृपया सहायता से संपर्क करें।",
        "एआय सेवा योग्यरित्या कॉन्फिगर केलेली नाही. कृपया मदतीसाठी संपर्क करा.",
    ]),
    ("errors.weather", [
        "Could not load the weather right now.",
        "अभी मौसम की जानकारी नहीं मिल सकी।",
        "सध्या हवामानाची माहिती मिळू शकली नाही.",
    ]),
    ("errors.recommendation", [
        "Failed to get recommendation. Please try again.",
        "सलाह प्राप्त नहीं हो सकी। कृपया फिर से प्रयास करें।",
        "सल्ला मिळू शकला नाही. कृपया पुन्हा प्रयत्न करा.",
    ]),
    ("errors.cropDoctor", [
        "Failed to analyze the image. Please try again.",
        "तस्वीर का विश्लेषण नहीं हो सका। कृपया फिर से प्रयास करें।",
        "फोटोचे विश्लेषण होऊ शकले नाही. कृपया पुन्हा प्रयत्न करा.",
    ]),
    ("errors.imageRequired", [
        "Please upload an image first.",
        "कृपया पहले एक तस्वीर अपलोड करें।",
        "कृपया आधी एक फोटो अपलोड करा.",
    ]),
    ("errors.speech", [
        "Sorry, we couldn't read the text aloud.",
        "क्षमा करें, हम पाठ को पढ़कर नहीं सुना सके।",
        "क्षमस्व, आम्ही मजकूर वाचून दाखवू शकलो नाही.",
    ]),
    ("speech.busy", [
        "Service busy. Using basic voice.",
        "सेवा व्यस्त है। साधारण आवाज़ का उपयोग हो रहा है।",
        "सेवा व्यस्त आहे. साधा आवाज वापरत आहे.",
    ]),
    ("speech.backup", ["Reading from backup.", "बैकअप से पढ़ा जा रहा है।", "बॅकअपमधून वाचत आहे."]),
];
